use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::config::EngineConfig;
use crate::consequence_system::assessment::ImpactAssessor;
use crate::consequence_system::scaling::{ConsequenceCalculator, ConsequenceMetrics};
use crate::consequence_system::severity::Severity;
use crate::entry_system::entry::{EntryOutcome, EntrySimulator, EntryState};
use crate::entry_system::impactor::ImpactorSpec;
use crate::errors::SimulationError;
use crate::fusion_system::fusion::{CatalogRequest, DataFusion};
use crate::fusion_system::sources::{
    AsteroidCatalogSource, DateRange, GeologicalSource, PopulationSource,
};
use crate::report_system::report::{ImpactReport, ReportParts};
use crate::utils::geo::Location;

/// One consumer request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRequest {
    pub impactor: ImpactorSpec,
    pub location: Location,
    #[serde(default)]
    pub catalog_object_id: Option<String>,
    /// Approach window searched for the catalog object; defaults to the
    /// configured number of days up to today
    #[serde(default)]
    pub catalog_window: Option<DateRange>,
}

impl ImpactRequest {
    pub fn new(impactor: ImpactorSpec, location: Location) -> Self {
        ImpactRequest {
            impactor,
            location,
            catalog_object_id: None,
            catalog_window: None,
        }
    }

    pub fn with_catalog_object(mut self, object_id: impl Into<String>) -> Self {
        self.catalog_object_id = Some(object_id.into());
        self
    }

    pub fn with_catalog_window(mut self, window: DateRange) -> Self {
        self.catalog_window = Some(window);
        self
    }
}

/// Physics half of the pipeline: entry, consequences and severity.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsOutcome {
    pub terminal_state: EntryState,
    pub entry_outcome: EntryOutcome,
    pub consequences: ConsequenceMetrics,
    pub severity: Severity,
}

pub struct ImpactEngine {
    config: EngineConfig,
    fusion: DataFusion,
    assessor: ImpactAssessor,
}

impl ImpactEngine {
    pub fn new(
        config: EngineConfig,
        catalog: Box<dyn AsteroidCatalogSource>,
        geology: Box<dyn GeologicalSource>,
        population: Box<dyn PopulationSource>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        Ok(ImpactEngine {
            fusion: DataFusion::new(catalog, geology, population, &config),
            assessor: ImpactAssessor::new(config.global_average_density_per_km2),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn simulator(&self, impactor: ImpactorSpec) -> Result<EntrySimulator, SimulationError> {
        EntrySimulator::new(impactor, self.config.entry.clone())
    }

    pub fn assess_physics(&self, impactor: &ImpactorSpec) -> Result<PhysicsOutcome, SimulationError> {
        let simulator = self.simulator(*impactor)?;
        let (terminal_state, entry_outcome) = simulator.run().finish()?;

        let consequences = ConsequenceCalculator::calculate(
            terminal_state.mass_kg,
            terminal_state.velocity_km_s * 1000.0,
            impactor.entry_angle_deg,
        )?;
        let severity = Severity::classify(consequences.energy_megatons);

        Ok(PhysicsOutcome {
            terminal_state,
            entry_outcome,
            consequences,
            severity,
        })
    }

    /// Runs the whole pipeline. Only malformed input and degenerate impacts
    /// fail; unavailable sources degrade to reference data.
    pub async fn run(&self, request: &ImpactRequest) -> Result<ImpactReport, SimulationError> {
        request.impactor.validate()?;
        request.location.validate()?;

        let started = Instant::now();
        let catalog_request = match &request.catalog_object_id {
            Some(id) => Some(CatalogRequest {
                object_id: id.clone(),
                window: match request.catalog_window {
                    Some(window) => window,
                    None => DateRange::ending_on(
                        Utc::now().date_naive(),
                        self.config.sources.catalog_window_days,
                    )?,
                },
            }),
            None => None,
        };

        // A physics error ends the request without waiting on the sources.
        let (enrichment, physics) = tokio::try_join!(
            self.fusion.enrich(request.location, catalog_request.as_ref()),
            async { self.assess_physics(&request.impactor) },
        )?;

        let assessment = self
            .assessor
            .assess(&physics.consequences, request.location, Some(&enrichment))?;

        let report = ImpactReport::assemble(ReportParts {
            impactor: request.impactor,
            location: request.location,
            terminal_state: physics.terminal_state,
            entry_outcome: physics.entry_outcome,
            consequences: physics.consequences,
            severity: physics.severity,
            assessment,
            enrichment,
        })?;

        log::info!(
            "{} impact ({:.3} Mt, {:?}) at ({:.2}, {:.2}) in {} ms",
            report.severity,
            report.consequences.energy_megatons,
            report.entry_outcome,
            report.location.latitude,
            report.location.longitude,
            started.elapsed().as_millis()
        );

        Ok(report)
    }
}
