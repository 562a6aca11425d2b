use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{CATASTROPHIC_THRESHOLD_MT, MODERATE_THRESHOLD_MT, SEVERE_THRESHOLD_MT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
    Catastrophic,
}

impl Severity {
    /// Lower bounds are inclusive, upper bounds exclusive.
    pub fn classify(energy_megatons: f64) -> Severity {
        if energy_megatons >= CATASTROPHIC_THRESHOLD_MT {
            Severity::Catastrophic
        } else if energy_megatons >= SEVERE_THRESHOLD_MT {
            Severity::Severe
        } else if energy_megatons >= MODERATE_THRESHOLD_MT {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Minor => "Minor",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::Catastrophic => "Catastrophic",
        };
        f.write_str(label)
    }
}
