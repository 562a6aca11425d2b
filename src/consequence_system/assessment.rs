use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CRATER_ZONE_COST_MULTIPLIER, PER_CAPITA_RECOVERY_COST, RESPONSE_COST_FRACTION,
};
use crate::errors::SimulationError;
use crate::fusion_system::sources::{EnrichmentData, Sourced};
use crate::utils::geo::Location;

use super::scaling::ConsequenceMetrics;

/// Casualty and cost estimate for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub affected_area_km2: f64,
    pub population_affected: u64,
    pub economic_damage_usd: f64,
    /// Density the estimate used, flagged `fallback` when it is the global default
    pub population_density_per_km2: Sourced<f64>,
}

pub struct ImpactAssessor {
    default_density_per_km2: f64,
}

impl ImpactAssessor {
    pub fn new(default_density_per_km2: f64) -> Self {
        ImpactAssessor {
            default_density_per_km2: default_density_per_km2.max(0.0),
        }
    }

    /// Without enrichment the global default density is used and flagged.
    /// Enrichment gathered for another location is rejected.
    pub fn assess(
        &self,
        metrics: &ConsequenceMetrics,
        location: Location,
        enrichment: Option<&EnrichmentData>,
    ) -> Result<ImpactAssessment, SimulationError> {
        location.validate()?;

        let density = match enrichment {
            Some(data) if data.location != location => {
                return Err(SimulationError::InvalidInput(format!(
                    "enrichment was gathered for ({}, {}), not ({}, {})",
                    data.location.latitude,
                    data.location.longitude,
                    location.latitude,
                    location.longitude
                )));
            }
            Some(data) => data.population_density_per_km2.clone(),
            None => {
                log::warn!("no enrichment data, assuming global average population density");
                Sourced::fallback(self.default_density_per_km2)
            }
        };

        let affected_area_km2 = affected_area(metrics);
        let population_affected = population_within(affected_area_km2, density.value);
        let economic_damage_usd =
            economic_damage(population_affected, metrics.crater_area_km2(), density.value);

        Ok(ImpactAssessment {
            affected_area_km2,
            population_affected,
            economic_damage_usd,
            population_density_per_km2: density,
        })
    }
}

/// Area inside the outermost blast ring [km²].
pub fn affected_area(metrics: &ConsequenceMetrics) -> f64 {
    metrics
        .outermost_ring()
        .map_or(0.0, |ring| PI * ring.radius_km.max(0.0).powi(2))
}

pub fn population_within(area_km2: f64, density_per_km2: f64) -> u64 {
    let people = (area_km2 * density_per_km2).round();
    if people.is_finite() && people > 0.0 {
        people as u64
    } else {
        0
    }
}

/// Two-tier damage: recovery cost per affected person across the blast zone,
/// plus the crater footprint at a higher per-km² rate, plus emergency response.
pub fn economic_damage(population_affected: u64, crater_area_km2: f64, density_per_km2: f64) -> f64 {
    let density = density_per_km2.max(0.0);
    let broad_zone = population_affected as f64 * PER_CAPITA_RECOVERY_COST;
    let crater_zone = crater_area_km2.max(0.0)
        * density
        * PER_CAPITA_RECOVERY_COST
        * CRATER_ZONE_COST_MULTIPLIER;

    (broad_zone + crater_zone) * (1.0 + RESPONSE_COST_FRACTION)
}
