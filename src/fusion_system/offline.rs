//! Adapters that answer without a network: a latitude/city heuristic for
//! population and readers for captured upstream responses on disk.

use std::path::{Path, PathBuf};

use crate::config::SourceSettings;
use crate::errors::{DataSource, UpstreamDataUnavailable};
use crate::utils::geo::Location;

use super::contracts::{parse_elevation, parse_neo_feed, parse_seismic_events, SeismicQuery};
use super::sources::{
    AsteroidCatalogSource, CatalogObject, DateRange, GeologicalContext, GeologicalSource,
    PopulationSource, SourceFuture,
};

// Population heuristic (people/km²)
const METRO_RADIUS_KM: f64 = 100.0;
const METRO_DENSITY: f64 = 1_000.0;
const TROPICAL_DENSITY: f64 = 50.0; // |lat| < 30
const TEMPERATE_DENSITY: f64 = 20.0; // |lat| < 60
const POLAR_DENSITY: f64 = 1.0;

const METRO_AREAS: [(&str, f64, f64); 5] = [
    ("New York", 40.7128, -74.0060),
    ("London", 51.5074, -0.1278),
    ("Tokyo", 35.6762, 139.6503),
    ("Mexico City", 19.4326, -99.1332),
    ("Delhi", 28.7041, 77.1025),
];

/// Coarse density estimate: dense near a handful of large metro areas,
/// otherwise by latitude band.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionalPopulationSource;

impl RegionalPopulationSource {
    pub fn estimate(location: Location) -> f64 {
        let near_metro = METRO_AREAS.iter().any(|(_, latitude, longitude)| {
            location.distance_km(&Location::new(*latitude, *longitude)) <= METRO_RADIUS_KM
        });
        if near_metro {
            return METRO_DENSITY;
        }

        let latitude = location.latitude.abs();
        if latitude < 30.0 {
            TROPICAL_DENSITY
        } else if latitude < 60.0 {
            TEMPERATE_DENSITY
        } else {
            POLAR_DENSITY
        }
    }
}

impl PopulationSource for RegionalPopulationSource {
    fn fetch(&self, location: Location) -> SourceFuture<'_, f64> {
        let density = Self::estimate(location);
        Box::pin(async move { Ok(density) })
    }
}

async fn read_capture(data_source: DataSource, path: &Path) -> Result<String, UpstreamDataUnavailable> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| UpstreamDataUnavailable::RequestFailed {
            data_source,
            reason: format!("{}: {}", path.display(), e),
        })
}

/// Serves a captured NeoWs feed response.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCatalogSource { path: path.into() }
    }
}

impl AsteroidCatalogSource for FileCatalogSource {
    fn fetch(&self, window: DateRange) -> SourceFuture<'_, Vec<CatalogObject>> {
        Box::pin(async move {
            log::debug!(
                "reading catalog capture {} for {}..{}",
                self.path.display(),
                window.start,
                window.end
            );
            let body = read_capture(DataSource::AsteroidCatalog, &self.path).await?;
            parse_neo_feed(&body)
        })
    }
}

/// Serves a captured USGS event query and, optionally, an elevation query.
#[derive(Debug, Clone)]
pub struct FileGeologicalSource {
    events_path: PathBuf,
    elevation_path: Option<PathBuf>,
    settings: SourceSettings,
}

impl FileGeologicalSource {
    pub fn new(events_path: impl Into<PathBuf>, settings: &SourceSettings) -> Self {
        FileGeologicalSource {
            events_path: events_path.into(),
            elevation_path: None,
            settings: settings.clone(),
        }
    }

    pub fn with_elevation(mut self, elevation_path: impl Into<PathBuf>) -> Self {
        self.elevation_path = Some(elevation_path.into());
        self
    }
}

impl GeologicalSource for FileGeologicalSource {
    fn fetch(&self, location: Location) -> SourceFuture<'_, GeologicalContext> {
        Box::pin(async move {
            log::debug!(
                "reading seismic capture {} for ({:.2}, {:.2})",
                self.events_path.display(),
                location.latitude,
                location.longitude
            );
            let body = read_capture(DataSource::Geological, &self.events_path).await?;
            let query = SeismicQuery::new(location, &self.settings);
            let seismicity = parse_seismic_events(&body, &query)?;

            let elevation_m = match &self.elevation_path {
                Some(path) => {
                    let body = read_capture(DataSource::Geological, path).await?;
                    Some(parse_elevation(&body)?)
                }
                None => None,
            };

            Ok::<_, UpstreamDataUnavailable>(GeologicalContext {
                seismicity,
                elevation_m,
            })
        })
    }
}
