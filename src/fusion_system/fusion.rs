use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::{EngineConfig, SourceTimeouts};
use crate::errors::{DataSource, SimulationError, UpstreamDataUnavailable};
use crate::utils::geo::Location;

use super::fallback::{
    find_catalog_object, reference_catalog, reference_geology, FALLBACK_ELEVATION_M,
};
use super::sources::{
    AsteroidCatalogSource, CatalogObject, DateRange, EnrichmentData, GeologicalContext,
    GeologicalSource, PopulationSource, Provenance, Sourced,
};

/// Which catalog object to look up, and over which approach window.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRequest {
    pub object_id: String,
    pub window: DateRange,
}

/// Queries the external sources concurrently and degrades each one to its
/// reference data independently.
pub struct DataFusion {
    catalog: Box<dyn AsteroidCatalogSource>,
    geology: Box<dyn GeologicalSource>,
    population: Box<dyn PopulationSource>,
    timeouts: SourceTimeouts,
    global_average_density: f64,
}

impl DataFusion {
    pub fn new(
        catalog: Box<dyn AsteroidCatalogSource>,
        geology: Box<dyn GeologicalSource>,
        population: Box<dyn PopulationSource>,
        config: &EngineConfig,
    ) -> Self {
        DataFusion {
            catalog,
            geology,
            population,
            timeouts: config.timeouts.clone(),
            global_average_density: config.global_average_density_per_km2,
        }
    }

    pub fn timeouts(&self) -> &SourceTimeouts {
        &self.timeouts
    }

    /// Fails only for malformed coordinates. Any source failure becomes a
    /// fallback value with `Provenance::Fallback`.
    pub async fn enrich(
        &self,
        location: Location,
        catalog_request: Option<&CatalogRequest>,
    ) -> Result<EnrichmentData, SimulationError> {
        location.validate()?;

        let started = Instant::now();
        let (catalog_object, geology, population_density) = tokio::join!(
            self.resolve_catalog_object(catalog_request),
            self.fetch_geology(location),
            self.fetch_population(location),
        );

        let provenance = geology.provenance;
        let GeologicalContext {
            seismicity,
            elevation_m,
        } = geology.value;

        let elevation_m = match elevation_m {
            Some(elevation) => Sourced {
                value: elevation,
                provenance,
            },
            None => {
                if provenance == Provenance::Live {
                    log::warn!(
                        "{} has no elevation for ({:.2}, {:.2}); using sea level",
                        DataSource::Geological,
                        location.latitude,
                        location.longitude
                    );
                }
                Sourced::fallback(FALLBACK_ELEVATION_M)
            }
        };

        let mut fallback_sources = Vec::new();
        if let Some((_, catalog_degraded)) = &catalog_object {
            if *catalog_degraded {
                fallback_sources.push(DataSource::AsteroidCatalog);
            }
        }
        if provenance == Provenance::Fallback || elevation_m.is_fallback() {
            fallback_sources.push(DataSource::Geological);
        }
        if population_density.is_fallback() {
            fallback_sources.push(DataSource::Population);
        }

        log::info!(
            "enrichment for ({:.2}, {:.2}) assembled in {} ms, {} fallback source(s)",
            location.latitude,
            location.longitude,
            started.elapsed().as_millis(),
            fallback_sources.len()
        );

        Ok(EnrichmentData {
            location,
            population_density_per_km2: population_density,
            historical_seismicity: Sourced {
                value: seismicity,
                provenance,
            },
            elevation_m,
            catalog_object: catalog_object.and_then(|(object, _)| object),
            fallback_sources,
        })
    }

    async fn fetch_geology(&self, location: Location) -> Sourced<GeologicalContext> {
        let fetch = async {
            let context = self.geology.fetch(location).await?;
            if let Some(elevation) = context.elevation_m.filter(|e| !e.is_finite()) {
                return Err(UpstreamDataUnavailable::InvalidResponse {
                    data_source: DataSource::Geological,
                    reason: format!("elevation {} is not a number", elevation),
                });
            }
            Ok::<_, UpstreamDataUnavailable>(context)
        };
        with_fallback(
            DataSource::Geological,
            self.timeouts.budget(DataSource::Geological),
            fetch,
            reference_geology,
        )
        .await
    }

    async fn fetch_population(&self, location: Location) -> Sourced<f64> {
        let fetch = async {
            let density = self.population.fetch(location).await?;
            if !(density.is_finite() && density >= 0.0) {
                return Err(UpstreamDataUnavailable::InvalidResponse {
                    data_source: DataSource::Population,
                    reason: format!("density {} is not a non-negative number", density),
                });
            }
            Ok::<_, UpstreamDataUnavailable>(density)
        };
        with_fallback(
            DataSource::Population,
            self.timeouts.budget(DataSource::Population),
            fetch,
            || self.global_average_density,
        )
        .await
    }

    /// `None` when no object was requested. Otherwise the found object (if
    /// any) and whether the catalog had to be degraded to reference data.
    async fn resolve_catalog_object(
        &self,
        request: Option<&CatalogRequest>,
    ) -> Option<(Option<Sourced<CatalogObject>>, bool)> {
        let request = request?;

        let catalog = with_fallback(
            DataSource::AsteroidCatalog,
            self.timeouts.budget(DataSource::AsteroidCatalog),
            self.catalog.fetch(request.window),
            reference_catalog,
        )
        .await;

        if let Some(object) = find_catalog_object(&catalog.value, &request.object_id) {
            let found = Sourced {
                value: object.clone(),
                provenance: catalog.provenance,
            };
            return Some((Some(found), catalog.is_fallback()));
        }

        if !catalog.is_fallback() {
            let reference = reference_catalog();
            if let Some(object) = find_catalog_object(&reference, &request.object_id) {
                log::warn!(
                    "catalog object {} not in the live window, using reference entry",
                    request.object_id
                );
                return Some((Some(Sourced::fallback(object.clone())), true));
            }
        }

        log::warn!("catalog object {} not found", request.object_id);
        Some((None, catalog.is_fallback()))
    }
}

/// The single fallback policy: one scoped timeout per source, no retry, and
/// reference data on any failure.
pub async fn with_fallback<T, F>(
    data_source: DataSource,
    budget: Duration,
    fetch: F,
    fallback: impl FnOnce() -> T,
) -> Sourced<T>
where
    F: Future<Output = Result<T, UpstreamDataUnavailable>>,
{
    let started = Instant::now();
    let error = match tokio::time::timeout(budget, fetch).await {
        Ok(Ok(value)) => {
            log::debug!(
                "{} answered in {} ms",
                data_source,
                started.elapsed().as_millis()
            );
            return Sourced::live(value);
        }
        Ok(Err(error)) => error,
        Err(_) => UpstreamDataUnavailable::Timeout {
            data_source,
            budget_ms: budget.as_millis() as u64,
        },
    };

    log::warn!("{}; using reference data", error);
    Sourced::fallback(fallback())
}
