use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ABLATION_RATE, AIRBURST_MASS_FRACTION, CATALOG_TIMEOUT_MS, CATALOG_WINDOW_DAYS, DRAG_RATE,
    ENTRY_ALTITUDE, GEOLOGICAL_TIMEOUT_MS, GLOBAL_AVERAGE_DENSITY, MAX_CATALOG_WINDOW_DAYS,
    MAX_ENTRY_STEPS, POPULATION_TIMEOUT_MS, SEISMIC_MIN_MAGNITUDE, SEISMIC_SEARCH_RADIUS_KM,
    TIME_STEP,
};
use crate::errors::{DataSource, SimulationError};

/// Tunables for the entry simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Altitude where stepping begins [km]
    pub start_altitude_km: f64,
    /// Fixed simulated time per step [s]
    pub time_step_s: f64,
    /// Fractional velocity loss per second at full density factor
    pub drag_rate: f64,
    /// Fractional mass loss per second at full density factor and initial speed
    pub ablation_rate: f64,
    /// Residual mass fraction that ends the entry as an airburst
    pub airburst_mass_fraction: f64,
    /// Hard cap on produced states
    pub max_steps: usize,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            start_altitude_km: ENTRY_ALTITUDE,
            time_step_s: TIME_STEP,
            drag_rate: DRAG_RATE,
            ablation_rate: ABLATION_RATE,
            airburst_mass_fraction: AIRBURST_MASS_FRACTION,
            max_steps: MAX_ENTRY_STEPS,
        }
    }
}

impl EntryConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        ensure(
            self.start_altitude_km > 0.0 && self.start_altitude_km.is_finite(),
            "entry.start_altitude_km must be > 0",
        )?;
        ensure(
            self.time_step_s > 0.0 && self.time_step_s.is_finite(),
            "entry.time_step_s must be > 0",
        )?;
        ensure(
            self.drag_rate >= 0.0 && self.drag_rate * self.time_step_s < 1.0,
            "entry.drag_rate must be >= 0 and drag_rate * time_step_s < 1",
        )?;
        ensure(
            self.ablation_rate >= 0.0 && self.ablation_rate.is_finite(),
            "entry.ablation_rate must be >= 0",
        )?;
        ensure(
            (0.0..1.0).contains(&self.airburst_mass_fraction),
            "entry.airburst_mass_fraction must be in [0, 1)",
        )?;
        ensure(self.max_steps >= 2, "entry.max_steps must be at least 2")?;
        Ok(())
    }
}

/// Per-source time budgets in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceTimeouts {
    pub catalog_ms: u64,
    pub geological_ms: u64,
    pub population_ms: u64,
}

impl Default for SourceTimeouts {
    fn default() -> Self {
        Self {
            catalog_ms: CATALOG_TIMEOUT_MS,
            geological_ms: GEOLOGICAL_TIMEOUT_MS,
            population_ms: POPULATION_TIMEOUT_MS,
        }
    }
}

impl SourceTimeouts {
    pub fn budget(&self, source: DataSource) -> Duration {
        let ms = match source {
            DataSource::AsteroidCatalog => self.catalog_ms,
            DataSource::Geological => self.geological_ms,
            DataSource::Population => self.population_ms,
        };
        Duration::from_millis(ms)
    }

    /// Upper bound on a concurrent fusion round.
    pub fn longest(&self) -> Duration {
        Duration::from_millis(
            self.catalog_ms
                .max(self.geological_ms)
                .max(self.population_ms),
        )
    }
}

/// Query parameters and credentials handed to the source adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub nasa_api_key: Option<String>,
    pub catalog_window_days: i64,
    pub seismic_radius_km: f64,
    pub seismic_min_magnitude: f64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            nasa_api_key: None,
            catalog_window_days: CATALOG_WINDOW_DAYS,
            seismic_radius_km: SEISMIC_SEARCH_RADIUS_KM,
            seismic_min_magnitude: SEISMIC_MIN_MAGNITUDE,
        }
    }
}

/// Everything the engine needs, handed in at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub entry: EntryConfig,
    pub timeouts: SourceTimeouts,
    pub sources: SourceSettings,
    /// Density used when the population source is unavailable [people/km²]
    pub global_average_density_per_km2: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entry: EntryConfig::default(),
            timeouts: SourceTimeouts::default(),
            sources: SourceSettings::default(),
            global_average_density_per_km2: GLOBAL_AVERAGE_DENSITY,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.entry.validate()?;
        ensure(
            self.timeouts.catalog_ms > 0
                && self.timeouts.geological_ms > 0
                && self.timeouts.population_ms > 0,
            "timeouts must be > 0 ms",
        )?;
        ensure(
            (0..=MAX_CATALOG_WINDOW_DAYS).contains(&self.sources.catalog_window_days),
            "sources.catalog_window_days must be in [0, 3660]",
        )?;
        ensure(
            self.sources.seismic_radius_km > 0.0,
            "sources.seismic_radius_km must be > 0",
        )?;
        ensure(
            self.global_average_density_per_km2 >= 0.0
                && self.global_average_density_per_km2.is_finite(),
            "global_average_density_per_km2 must be >= 0",
        )?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| SimulationError::Configuration(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }
}

fn ensure(condition: bool, message: &str) -> Result<(), SimulationError> {
    if condition {
        Ok(())
    } else {
        Err(SimulationError::Configuration(message.to_string()))
    }
}
