pub mod config;
pub mod consequence_system;
pub mod constants;
pub mod engine;
pub mod entry_system;
pub mod errors;
pub mod fusion_system;
pub mod report_system;
pub mod utils;

pub use config::{EngineConfig, EntryConfig, SourceSettings, SourceTimeouts};
pub use constants::*;
pub use engine::{ImpactEngine, ImpactRequest, PhysicsOutcome};
pub use errors::{DataSource, SimulationError, UpstreamDataUnavailable};

// Re-export commonly used items from entry_system
pub use entry_system::entry::{EntryOutcome, EntrySimulator, EntryState, EntryTrajectory};
pub use entry_system::impactor::{Composition, ImpactorSpec};

// Re-export commonly used items from consequence_system
pub use consequence_system::assessment::{ImpactAssessment, ImpactAssessor};
pub use consequence_system::scaling::{BlastRing, ConsequenceCalculator, ConsequenceMetrics};
pub use consequence_system::severity::Severity;

// Re-export commonly used items from fusion_system
pub use fusion_system::catalog::{CatalogSummary, RiskLevel};
pub use fusion_system::contracts::{elevation_url, earthquake_url, neo_feed_url, SeismicQuery};
pub use fusion_system::fusion::{CatalogRequest, DataFusion};
pub use fusion_system::offline::{FileCatalogSource, FileGeologicalSource, RegionalPopulationSource};
pub use fusion_system::sources::{
    AsteroidCatalogSource, CatalogObject, DateRange, EnrichmentData, GeologicalContext,
    GeologicalSource, PopulationSource, Provenance, SeismicitySummary, SourceFuture, Sourced,
    UnavailableSource,
};

// Re-export commonly used items from report_system
pub use report_system::report::{ImpactReport, REPORT_SCHEMA_VERSION};
pub use report_system::telemetry::EntryTelemetry;

// Re-export commonly used utilities
pub use utils::geo::Location;
