//! Domain error types.
//!
//! Most runtime failures in this system degrade silently (missing optional
//! capabilities, unknown navigation targets, playback rejections); the
//! variants here cover the hard failures that can only occur at
//! construction or configuration time, plus the simulation bridge boundary.

use thiserror::Error;

use crate::ids::StageId;

/// Top-level error type for the experience engine.
#[derive(Debug, Error)]
pub enum ExperienceError {
    /// A stage id referenced somewhere does not exist in the registry.
    #[error("unknown stage: {0}")]
    UnknownStage(StageId),

    /// The stage registry failed structural validation.
    #[error("invalid stage registry: {0}")]
    InvalidRegistry(String),

    /// A mission id outside the valid range (missions are positive).
    #[error("invalid mission id: {0}")]
    InvalidMissionId(u32),

    /// A configuration value is missing or malformed.
    #[error("configuration error: {name}: {reason}")]
    Config {
        /// The configuration key at fault.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The simulation bridge failed to deliver a message.
    #[error("simulation bridge error: {0}")]
    Bridge(String),
}
