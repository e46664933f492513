//! Korkyra — Stage Registry bounded context.
//!
//! Owns the immutable mapping from stage id to stage definition, the
//! declarative action effects the navigator executes, YAML ingestion of
//! authored stage files, and the built-in museum story.

pub mod markup;
pub mod registry;
pub mod stage;
pub mod story;

pub use registry::StageRegistry;
pub use stage::{ActionEffect, Stage, StageAction};
