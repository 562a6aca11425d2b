use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consequence_system::scaling::ConsequenceCalculator;
use crate::constants::JOULES_PER_MEGATON;
use crate::entry_system::impactor::{Composition, ImpactorSpec};

use super::sources::CatalogObject;

// Risk score weights
const DIAMETER_WEIGHT: f64 = 1000.0; // points per km
const VELOCITY_DIVISOR: f64 = 1000.0; // km/h per point
const MISS_DISTANCE_UNIT_KM: f64 = 1e6;
const MIN_MISS_DISTANCE_UNITS: f64 = 0.1;
const HIGH_RISK_SCORE: f64 = 100.0;
const MEDIUM_RISK_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Larger, faster and closer objects score higher.
pub fn risk_score(object: &CatalogObject) -> f64 {
    let miss_units = (object.miss_distance_km / MISS_DISTANCE_UNIT_KM).max(MIN_MISS_DISTANCE_UNITS);
    object.diameter_km * DIAMETER_WEIGHT + object.velocity_km_h / VELOCITY_DIVISOR + 1.0 / miss_units
}

pub fn risk_level(score: f64) -> RiskLevel {
    if score > HIGH_RISK_SCORE {
        RiskLevel::High
    } else if score > MEDIUM_RISK_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Kinetic energy of the object as if it arrived intact at its catalogued
/// speed with rocky density [Mt].
pub fn potential_energy_megatons(object: &CatalogObject) -> f64 {
    let spec = ImpactorSpec::from_catalog_object(object, Composition::Rocky, 90.0);
    ConsequenceCalculator::kinetic_energy(spec.mass_kg(), spec.velocity_km_s * 1000.0)
        / JOULES_PER_MEGATON
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedObject {
    pub object: CatalogObject,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub potential_energy_megatons: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub object_count: usize,
    pub hazardous_count: usize,
    pub total_energy_megatons: f64,
    pub max_energy_megatons: f64,
    pub largest_object: Option<String>,
}

impl CatalogSummary {
    pub fn from_objects(objects: &[CatalogObject]) -> Self {
        let mut summary = CatalogSummary {
            object_count: objects.len(),
            hazardous_count: 0,
            total_energy_megatons: 0.0,
            max_energy_megatons: 0.0,
            largest_object: None,
        };

        let mut largest_diameter = f64::NEG_INFINITY;
        for object in objects {
            if object.hazardous {
                summary.hazardous_count += 1;
            }
            let energy = potential_energy_megatons(object);
            summary.total_energy_megatons += energy;
            summary.max_energy_megatons = summary.max_energy_megatons.max(energy);
            if object.diameter_km > largest_diameter {
                largest_diameter = object.diameter_km;
                summary.largest_object = Some(object.name.clone());
            }
        }

        summary
    }
}

/// Objects ordered from highest to lowest risk score.
pub fn rank_objects(objects: &[CatalogObject]) -> Vec<RankedObject> {
    let mut ranked: Vec<RankedObject> = objects
        .iter()
        .map(|object| {
            let score = risk_score(object);
            RankedObject {
                object: object.clone(),
                risk_score: score,
                risk_level: risk_level(score),
                potential_energy_megatons: potential_energy_megatons(object),
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion_system::fallback::reference_catalog;
    use approx::assert_relative_eq;

    fn object(diameter_km: f64, velocity_km_h: f64, miss_distance_km: f64) -> CatalogObject {
        CatalogObject {
            id: "test".to_string(),
            name: "test".to_string(),
            diameter_km,
            velocity_km_h,
            miss_distance_km,
            approach_date: "2025-10-04".to_string(),
            hazardous: false,
        }
    }

    #[test]
    fn test_risk_score_terms() {
        // 0.05 km -> 50, 36000 km/h -> 36, 2e6 km -> 0.5
        let score = risk_score(&object(0.05, 36_000.0, 2_000_000.0));
        assert_relative_eq!(score, 86.5, max_relative = 1e-12);
        assert_eq!(risk_level(score), RiskLevel::Medium);

        // very close passes are capped at 10 points
        let close = risk_score(&object(0.0, 0.0, 10.0));
        assert_relative_eq!(close, 10.0);
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(risk_level(100.0), RiskLevel::Medium);
        assert_eq!(risk_level(100.1), RiskLevel::High);
        assert_eq!(risk_level(50.0), RiskLevel::Low);
        assert!(RiskLevel::High > RiskLevel::Low);
    }

    #[test]
    fn test_potential_energy() {
        // 1 km rocky body at 72000 km/h (20 km/s)
        let energy = potential_energy_megatons(&object(1.0, 72_000.0, 1e7));
        let mass = 4.0 / 3.0 * std::f64::consts::PI * 500.0f64.powi(3) * 3000.0;
        assert_relative_eq!(
            energy,
            0.5 * mass * 20_000.0f64.powi(2) / 4.184e15,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_summary_of_reference_catalog() {
        let catalog = reference_catalog();
        let summary = CatalogSummary::from_objects(&catalog);

        assert_eq!(summary.object_count, 4);
        assert_eq!(summary.hazardous_count, 2);
        assert_eq!(summary.largest_object.as_deref(), Some("186822 (2004 FE31)"));
        assert!(summary.max_energy_megatons <= summary.total_energy_megatons);
        assert!(summary.max_energy_megatons > 0.0);

        let empty = CatalogSummary::from_objects(&[]);
        assert_eq!(empty.object_count, 0);
        assert!(empty.largest_object.is_none());
    }

    #[test]
    fn test_rank_objects_descending() {
        let ranked = rank_objects(&reference_catalog());
        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            assert!(pair[0].risk_score >= pair[1].risk_score);
        }
        assert_eq!(ranked[0].object.id, "2186822");
        assert_eq!(ranked[0].risk_level, RiskLevel::High);
    }
}
