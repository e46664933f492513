//! Korkyra — experience session.
//!
//! The session object replaces the module-level globals of a naive
//! front-end script: it owns the navigator, narration controller, AR
//! session manager, mission handoff, and the ports, and runs the
//! single-threaded cooperative event loop that ties them together.

pub mod event;
pub mod journal;
mod session;

pub use event::SessionEvent;
pub use journal::{Journal, JournalEntry, JournalKind};
pub use session::{ExperienceSession, SessionConfig, SessionPorts};
