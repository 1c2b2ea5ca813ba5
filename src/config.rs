//! Contest definitions and engine tunables.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::state::{ListState, validate_names};

/// Failure to load contest definitions.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid JSON for the expected shape.
    Serde(serde_json::Error),
    /// A contest failed validation.
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// A configured participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberConfig {
    /// Display name, unique within the contest.
    pub name: String,
    /// Profile page.
    pub profile_url: String,
    /// List to fetch each cycle.
    pub contest_url: String,
    /// Optional snapshot to start from instead of an empty list.
    #[serde(default)]
    pub list: Option<ListState>,
}

/// A configured contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestConfig {
    /// Contest name; also the key stored state is saved under.
    pub name: String,
    /// Participants in configured order.
    pub members: Vec<MemberConfig>,
}

impl ContestConfig {
    /// Rejects blank names and duplicate member names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_names(&self.name, self.members.iter().map(|m| m.name.as_str()))
            .map_err(|err| ConfigError::Invalid(format!("contest {:?}: {err:?}", self.name)))
    }
}

/// Parses and validates a JSON list of contest definitions.
pub fn parse_contests(json: &str) -> Result<Vec<ContestConfig>, ConfigError> {
    let contests: Vec<ContestConfig> = serde_json::from_str(json)?;
    for contest in &contests {
        contest.validate()?;
    }
    Ok(contests)
}

/// Reads contest definitions from a JSON file.
pub fn load_contests(path: impl AsRef<Path>) -> Result<Vec<ContestConfig>, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    parse_contests(&raw)
}

/// Knobs for an update cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Resolve runtime and poster for newly seen films.
    pub get_film_details: bool,
    /// Concurrent list fetches; zero is treated as one.
    pub fetch_concurrency: usize,
    /// Limit on a single list fetch.
    pub fetch_timeout_ms: u64,
    /// Budget for all detail lookups of one member in one cycle.
    pub metadata_timeout_ms: u64,
    /// Saved states kept per contest after each save; `None` keeps all.
    pub keep_history: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            get_film_details: false,
            fetch_concurrency: 4,
            fetch_timeout_ms: 30_000,
            metadata_timeout_ms: 10_000,
            keep_history: Some(10),
        }
    }
}

impl EngineConfig {
    /// Effective fetch pool size.
    pub fn concurrency(&self) -> usize {
        self.fetch_concurrency.max(1)
    }

    /// [`Self::fetch_timeout_ms`] as a duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// [`Self::metadata_timeout_ms`] as a duration.
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }
}
