//! Identifier newtypes.
//!
//! Stage ids are author-chosen string keys; marker and mission ids are the
//! small integers the tracking engine and simulation runtime speak.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExperienceError;

/// Opaque key uniquely identifying a stage in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

impl StageId {
    /// Creates a stage id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StageId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Positive integer identifying which mission the simulation should load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MissionId(u32);

impl MissionId {
    /// Creates a mission id.
    ///
    /// # Errors
    ///
    /// Returns `ExperienceError::InvalidMissionId` if `id` is zero.
    pub fn new(id: u32) -> Result<Self, ExperienceError> {
        if id == 0 {
            return Err(ExperienceError::InvalidMissionId(id));
        }
        Ok(Self(id))
    }

    /// Returns the raw mission number.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for MissionId {
    type Error = ExperienceError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<MissionId> for u32 {
    fn from(id: MissionId) -> Self {
        id.0
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a physical marker the tracking engine can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub u32);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_id_rejects_zero() {
        // Act + Assert
        assert!(MissionId::new(0).is_err());
    }

    #[test]
    fn test_mission_id_accepts_positive() {
        // Act
        let id = MissionId::new(2).unwrap();

        // Assert
        assert_eq!(id.get(), 2);
    }

    #[test]
    fn test_stage_id_display_matches_key() {
        // Act
        let id = StageId::from("main-screen");

        // Assert
        assert_eq!(id.to_string(), "main-screen");
        assert_eq!(id.as_str(), "main-screen");
    }
}
