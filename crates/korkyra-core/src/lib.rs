//! Korkyra Core — shared domain abstractions.
//!
//! This crate defines the identifier types, the error type, and the port
//! traits for the external collaborators (view surfaces, audio output,
//! speech synthesis, marker tracking, embedded simulation) that every other
//! crate depends on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod ids;
pub mod ports;
