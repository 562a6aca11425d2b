use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consequence_system::assessment::ImpactAssessment;
use crate::consequence_system::scaling::ConsequenceMetrics;
use crate::consequence_system::severity::Severity;
use crate::entry_system::entry::{EntryOutcome, EntryState};
use crate::entry_system::impactor::ImpactorSpec;
use crate::errors::{DataSource, SimulationError};
use crate::fusion_system::sources::EnrichmentData;
use crate::utils::geo::Location;

pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Outputs of every pipeline stage for one request.
#[derive(Debug, Clone)]
pub struct ReportParts {
    pub impactor: ImpactorSpec,
    pub location: Location,
    pub terminal_state: EntryState,
    pub entry_outcome: EntryOutcome,
    pub consequences: ConsequenceMetrics,
    pub severity: Severity,
    pub assessment: ImpactAssessment,
    pub enrichment: EnrichmentData,
}

/// The engine's only output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub schema_version: u32,
    pub impactor: ImpactorSpec,
    pub location: Location,
    pub terminal_state: EntryState,
    pub entry_outcome: EntryOutcome,
    pub consequences: ConsequenceMetrics,
    pub severity: Severity,
    pub affected_area_km2: f64,
    pub population_affected: u64,
    pub economic_damage_usd: f64,
    pub enrichment: EnrichmentData,
    /// Sources whose reference data was used, empty when everything was live
    pub fallback_sources: Vec<DataSource>,
}

impl ImpactReport {
    /// Structural merge. Rejects parts that were not computed for the same
    /// request.
    pub fn assemble(parts: ReportParts) -> Result<Self, SimulationError> {
        let ReportParts {
            impactor,
            location,
            terminal_state,
            entry_outcome,
            consequences,
            severity,
            assessment,
            enrichment,
        } = parts;

        if enrichment.location != location {
            return Err(SimulationError::InvalidInput(format!(
                "report location ({}, {}) differs from enrichment location ({}, {})",
                location.latitude,
                location.longitude,
                enrichment.location.latitude,
                enrichment.location.longitude
            )));
        }
        if assessment.population_density_per_km2 != enrichment.population_density_per_km2 {
            return Err(SimulationError::InvalidInput(
                "assessment used a population density other than the enrichment's".to_string(),
            ));
        }
        if severity != Severity::classify(consequences.energy_megatons) {
            return Err(SimulationError::InvalidInput(format!(
                "severity {} does not match {:.3} Mt",
                severity, consequences.energy_megatons
            )));
        }

        let fallback_sources = enrichment.fallback_sources.clone();

        Ok(ImpactReport {
            schema_version: REPORT_SCHEMA_VERSION,
            impactor,
            location,
            terminal_state,
            entry_outcome,
            consequences,
            severity,
            affected_area_km2: assessment.affected_area_km2,
            population_affected: assessment.population_affected,
            economic_damage_usd: assessment.economic_damage_usd,
            enrichment,
            fallback_sources,
        })
    }

    pub fn uses_reference_data(&self) -> bool {
        !self.fallback_sources.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Flat, plain-text-ready view for the narrative generator.
    pub fn narrative_parameters(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            params.insert(key.to_string(), value);
        };

        put("impactor_diameter_m", format!("{:.1}", self.impactor.diameter_m));
        put("impactor_velocity_km_s", format!("{:.2}", self.impactor.velocity_km_s));
        put("impactor_density_kg_m3", format!("{:.0}", self.impactor.density_kg_m3));
        put("entry_angle_deg", format!("{:.1}", self.impactor.entry_angle_deg));
        put("latitude", format!("{:.4}", self.location.latitude));
        put("longitude", format!("{:.4}", self.location.longitude));

        put(
            "entry_outcome",
            match self.entry_outcome {
                EntryOutcome::GroundImpact => "ground impact".to_string(),
                EntryOutcome::Airburst => format!(
                    "airburst at {:.1} km altitude",
                    self.terminal_state.altitude_km
                ),
            },
        );
        put("energy_megatons", format!("{:.3}", self.consequences.energy_megatons));
        put("crater_diameter_km", format!("{:.3}", self.consequences.crater_diameter_km));
        put("seismic_magnitude", format!("{:.1}", self.consequences.seismic_magnitude));
        if let Some(ring) = self.consequences.outermost_ring() {
            put(
                "outermost_blast_radius_km",
                format!("{:.2} ({})", ring.radius_km, ring.description),
            );
        }
        put("severity", self.severity.to_string());

        put("population_affected", self.population_affected.to_string());
        put("economic_damage_usd", format!("{:.0}", self.economic_damage_usd));
        put(
            "population_density_per_km2",
            format!("{:.1}", self.enrichment.population_density_per_km2.value),
        );
        put("elevation_m", format!("{:.0}", self.enrichment.elevation_m.value));

        let seismicity = &self.enrichment.historical_seismicity.value;
        put(
            "historical_seismicity",
            match seismicity.max_magnitude {
                Some(max) => format!("{} events, strongest M{:.1}", seismicity.event_count, max),
                None => "no notable activity".to_string(),
            },
        );

        if let Some(object) = &self.enrichment.catalog_object {
            put("catalog_object", object.value.name.clone());
        }

        put(
            "data_quality",
            if self.uses_reference_data() {
                let sources: Vec<String> =
                    self.fallback_sources.iter().map(|s| s.to_string()).collect();
                format!("reference data used for {}", sources.join(", "))
            } else {
                "live".to_string()
            },
        );

        params
    }
}
