#![allow(dead_code)]

use std::time::Duration;

use impact_simulation::{
    AsteroidCatalogSource, CatalogObject, DateRange, EngineConfig, GeologicalContext,
    GeologicalSource, ImpactEngine, Location, PopulationSource, SeismicitySummary, SourceFuture,
    SourceTimeouts,
};

pub struct FixedCatalog(pub Vec<CatalogObject>);

impl AsteroidCatalogSource for FixedCatalog {
    fn fetch(&self, _window: DateRange) -> SourceFuture<'_, Vec<CatalogObject>> {
        let objects = self.0.clone();
        Box::pin(async move { Ok(objects) })
    }
}

pub struct FixedGeology(pub GeologicalContext);

impl GeologicalSource for FixedGeology {
    fn fetch(&self, _location: Location) -> SourceFuture<'_, GeologicalContext> {
        let context = self.0.clone();
        Box::pin(async move { Ok(context) })
    }
}

pub struct FixedPopulation(pub f64);

impl PopulationSource for FixedPopulation {
    fn fetch(&self, _location: Location) -> SourceFuture<'_, f64> {
        let density = self.0;
        Box::pin(async move { Ok(density) })
    }
}

/// Never answers within any sensible budget.
pub struct Unresponsive;

const HANG: Duration = Duration::from_secs(3600);

impl AsteroidCatalogSource for Unresponsive {
    fn fetch(&self, _window: DateRange) -> SourceFuture<'_, Vec<CatalogObject>> {
        Box::pin(async {
            tokio::time::sleep(HANG).await;
            Ok(Vec::new())
        })
    }
}

impl GeologicalSource for Unresponsive {
    fn fetch(&self, _location: Location) -> SourceFuture<'_, GeologicalContext> {
        Box::pin(async {
            tokio::time::sleep(HANG).await;
            Ok(seismic_context())
        })
    }
}

impl PopulationSource for Unresponsive {
    fn fetch(&self, _location: Location) -> SourceFuture<'_, f64> {
        Box::pin(async {
            tokio::time::sleep(HANG).await;
            Ok(5_000.0)
        })
    }
}

pub fn seismic_context() -> GeologicalContext {
    GeologicalContext {
        seismicity: SeismicitySummary {
            event_count: 12,
            max_magnitude: Some(6.1),
            mean_magnitude: Some(4.7),
            strongest_event_place: Some("20 km E of Test Ridge".to_string()),
        },
        elevation_m: Some(340.0),
    }
}

pub fn live_engine(density: f64) -> ImpactEngine {
    ImpactEngine::new(
        EngineConfig::default(),
        Box::new(FixedCatalog(Vec::new())),
        Box::new(FixedGeology(seismic_context())),
        Box::new(FixedPopulation(density)),
    )
    .unwrap()
}

pub fn short_timeouts() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.timeouts = SourceTimeouts {
        catalog_ms: 400,
        geological_ms: 250,
        population_ms: 150,
    };
    config
}
