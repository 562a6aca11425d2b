use std::future::Future;
use std::pin::Pin;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::errors::{DataSource, SimulationError, UpstreamDataUnavailable};
use crate::utils::geo::Location;

/// Future returned by every source adapter.
pub type SourceFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, UpstreamDataUnavailable>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Live,
    Fallback,
}

/// A value tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Sourced<T> {
    pub fn live(value: T) -> Self {
        Sourced {
            value,
            provenance: Provenance::Live,
        }
    }

    pub fn fallback(value: T) -> Self {
        Sourced {
            value,
            provenance: Provenance::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::Fallback
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            provenance: self.provenance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogObject {
    pub id: String,
    pub name: String,
    pub diameter_km: f64,
    pub velocity_km_h: f64,
    pub miss_distance_km: f64,
    pub approach_date: String,
    pub hazardous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SimulationError> {
        if end < start {
            return Err(SimulationError::InvalidInput(format!(
                "catalog window ends ({}) before it starts ({})",
                end, start
            )));
        }
        Ok(DateRange { start, end })
    }

    /// The `days` days up to and including `end`.
    pub fn ending_on(end: NaiveDate, days: i64) -> Result<Self, SimulationError> {
        let start = TimeDelta::try_days(days.max(0))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                SimulationError::InvalidInput(format!(
                    "catalog window of {} days before {} is out of range",
                    days, end
                ))
            })?;
        Ok(DateRange { start, end })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicitySummary {
    pub event_count: usize,
    pub max_magnitude: Option<f64>,
    pub mean_magnitude: Option<f64>,
    pub strongest_event_place: Option<String>,
}

impl SeismicitySummary {
    pub fn quiet() -> Self {
        SeismicitySummary {
            event_count: 0,
            max_magnitude: None,
            mean_magnitude: None,
            strongest_event_place: None,
        }
    }
}

/// What the geological source reports for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeologicalContext {
    pub seismicity: SeismicitySummary,
    /// `None` when the source has no elevation for the point
    pub elevation_m: Option<f64>,
}

/// External-data fields attached to a report, each with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentData {
    pub location: Location,
    pub population_density_per_km2: Sourced<f64>,
    pub historical_seismicity: Sourced<SeismicitySummary>,
    pub elevation_m: Sourced<f64>,
    /// Requested catalog object, if one was asked for and found
    pub catalog_object: Option<Sourced<CatalogObject>>,
    /// Sources whose reference data replaced a live answer
    pub fallback_sources: Vec<DataSource>,
}

impl EnrichmentData {
    pub fn all_fallback(&self) -> bool {
        self.population_density_per_km2.is_fallback()
            && self.historical_seismicity.is_fallback()
            && self.elevation_m.is_fallback()
            && self
                .catalog_object
                .as_ref()
                .map_or(true, |object| object.is_fallback())
    }
}

pub trait AsteroidCatalogSource: Send + Sync {
    fn fetch(&self, window: DateRange) -> SourceFuture<'_, Vec<CatalogObject>>;
}

pub trait GeologicalSource: Send + Sync {
    fn fetch(&self, location: Location) -> SourceFuture<'_, GeologicalContext>;
}

pub trait PopulationSource: Send + Sync {
    fn fetch(&self, location: Location) -> SourceFuture<'_, f64>;
}

/// Adapter for a collaborator that is not wired up.
pub struct UnavailableSource {
    pub data_source: DataSource,
}

impl UnavailableSource {
    pub fn new(data_source: DataSource) -> Self {
        UnavailableSource { data_source }
    }

    fn unavailable<T>(&self) -> SourceFuture<'_, T>
    where
        T: Send + 'static,
    {
        let error = UpstreamDataUnavailable::RequestFailed {
            data_source: self.data_source,
            reason: "no adapter configured".to_string(),
        };
        Box::pin(async move { Err(error) })
    }
}

impl AsteroidCatalogSource for UnavailableSource {
    fn fetch(&self, _window: DateRange) -> SourceFuture<'_, Vec<CatalogObject>> {
        self.unavailable()
    }
}

impl GeologicalSource for UnavailableSource {
    fn fetch(&self, _location: Location) -> SourceFuture<'_, GeologicalContext> {
        self.unavailable()
    }
}

impl PopulationSource for UnavailableSource {
    fn fetch(&self, _location: Location) -> SourceFuture<'_, f64> {
        self.unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sourced_map_keeps_provenance() {
        let sourced = Sourced::fallback(2.0).map(|v| v * 10.0);
        assert_eq!(sourced.value, 20.0);
        assert!(sourced.is_fallback());
        assert!(!Sourced::live(1).is_fallback());
    }

    #[test]
    fn test_provenance_serializes_lowercase() {
        let json = serde_json::to_string(&Sourced::live(3.5)).unwrap();
        assert_eq!(json, r#"{"value":3.5,"provenance":"live"}"#);
    }

    #[test]
    fn test_date_range() {
        let end = NaiveDate::from_ymd_opt(2025, 10, 4).unwrap();
        let window = DateRange::ending_on(end, 7).unwrap();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2025, 9, 27).unwrap());

        assert!(DateRange::new(end, window.start).is_err());
        assert!(DateRange::new(window.start, end).is_ok());
    }

    #[test]
    fn test_date_range_out_of_calendar() {
        let end = NaiveDate::from_ymd_opt(2025, 10, 4).unwrap();
        assert!(matches!(
            DateRange::ending_on(end, 10_000_000_000),
            Err(SimulationError::InvalidInput(_))
        ));
        assert!(matches!(
            DateRange::ending_on(end, i64::MAX),
            Err(SimulationError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_unavailable_source_reports_its_kind() {
        let source = UnavailableSource::new(DataSource::Population);
        let error = PopulationSource::fetch(&source, Location::new(0.0, 0.0))
            .await
            .unwrap_err();
        assert_eq!(error.data_source(), DataSource::Population);
    }
}
