//! Application configuration, read from the environment once at startup.

use std::path::PathBuf;
use std::time::Duration;

use korkyra_core::error::ExperienceError;
use korkyra_core::ids::StageId;
use korkyra_handoff::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_INTERVAL};

const SECTION_VAR: &str = "KORKYRA_SECTION";
const RETRY_MS_VAR: &str = "KORKYRA_HANDSHAKE_RETRY_MS";
const MAX_ATTEMPTS_VAR: &str = "KORKYRA_HANDSHAKE_MAX_ATTEMPTS";
const STORY_VAR: &str = "KORKYRA_STORY";

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Entry stage hint, the equivalent of the page's `?section=` query
    /// parameter.
    pub entry_hint: Option<StageId>,
    /// Handshake retry interval.
    pub retry_interval: Duration,
    /// Handshake attempt budget.
    pub max_attempts: u32,
    /// Optional path to a YAML stage file overriding the built-in story.
    pub story_path: Option<PathBuf>,
}

impl AppConfig {
    /// Reads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ExperienceError::Config` for unparseable numeric values.
    pub fn from_env() -> Result<Self, ExperienceError> {
        Ok(Self {
            entry_hint: std::env::var(SECTION_VAR).ok().map(StageId::new),
            retry_interval: parse_retry_ms(std::env::var(RETRY_MS_VAR).ok())?,
            max_attempts: parse_max_attempts(std::env::var(MAX_ATTEMPTS_VAR).ok())?,
            story_path: std::env::var(STORY_VAR).ok().map(PathBuf::from),
        })
    }
}

fn parse_retry_ms(value: Option<String>) -> Result<Duration, ExperienceError> {
    match value {
        None => Ok(DEFAULT_RETRY_INTERVAL),
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ExperienceError::Config {
                name: RETRY_MS_VAR.to_owned(),
                reason: format!("expected milliseconds as an integer: {e}"),
            }),
    }
}

fn parse_max_attempts(value: Option<String>) -> Result<u32, ExperienceError> {
    match value {
        None => Ok(DEFAULT_MAX_ATTEMPTS),
        Some(raw) => raw.parse::<u32>().map_err(|e| ExperienceError::Config {
            name: MAX_ATTEMPTS_VAR.to_owned(),
            reason: format!("expected a positive integer: {e}"),
        }),
    }
}
