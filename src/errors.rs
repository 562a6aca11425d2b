use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate impact: {0}")]
    DegenerateImpact(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// The external collaborators the fusion layer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    AsteroidCatalog,
    Geological,
    Population,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSource::AsteroidCatalog => "asteroid catalog",
            DataSource::Geological => "geological source",
            DataSource::Population => "population source",
        };
        f.write_str(name)
    }
}

/// Per-source failure. Converted to a fallback by the fusion layer, never
/// returned to callers of the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UpstreamDataUnavailable {
    #[error("{data_source} did not answer within {budget_ms} ms")]
    Timeout { data_source: DataSource, budget_ms: u64 },

    #[error("{data_source} request failed: {reason}")]
    RequestFailed {
        data_source: DataSource,
        reason: String,
    },

    #[error("{data_source} returned an unusable response: {reason}")]
    InvalidResponse {
        data_source: DataSource,
        reason: String,
    },
}

impl UpstreamDataUnavailable {
    pub fn data_source(&self) -> DataSource {
        match self {
            UpstreamDataUnavailable::Timeout { data_source, .. }
            | UpstreamDataUnavailable::RequestFailed { data_source, .. }
            | UpstreamDataUnavailable::InvalidResponse { data_source, .. } => *data_source,
        }
    }
}
