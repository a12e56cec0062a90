//! Correlation type for a single relay run
//!
//! Every log event emitted while relaying one pull request carries the same
//! `run_id`, so a CI log can be filtered down to one run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one relay run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new time-ordered RunId (UUIDv7)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reuse an id supplied by the caller (e.g. a CI job id)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
