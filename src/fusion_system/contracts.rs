//! Contracts of the upstream services: NASA NeoWs feed, USGS FDSN event
//! GeoJSON and USGS EPQS elevation. Responses that do not match are an
//! `InvalidResponse` and end up as a fallback.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::config::SourceSettings;
use crate::errors::{DataSource, UpstreamDataUnavailable};
use crate::utils::geo::Location;

use super::sources::{CatalogObject, DateRange, SeismicitySummary};

pub const NEO_FEED_ENDPOINT: &str = "https://api.nasa.gov/neo/rest/v1/feed";
pub const EARTHQUAKE_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";
pub const ELEVATION_ENDPOINT: &str = "https://nationalmap.gov/epqs/pqs.php";
const DEMO_API_KEY: &str = "DEMO_KEY";
const EARTHQUAKE_EVENT_LIMIT: u32 = 100;
// EPQS answers -1000000 where it has no data
const MIN_ELEVATION_M: f64 = -11_000.0;
const MAX_ELEVATION_M: f64 = 9_000.0;

/// Area searched for historical seismicity around an impact site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeismicQuery {
    pub center: Location,
    pub radius_km: f64,
    pub min_magnitude: f64,
}

impl SeismicQuery {
    pub fn new(center: Location, settings: &SourceSettings) -> Self {
        SeismicQuery {
            center,
            radius_km: settings.seismic_radius_km,
            min_magnitude: settings.seismic_min_magnitude,
        }
    }
}

pub fn neo_feed_url(window: DateRange, api_key: Option<&str>) -> String {
    format!(
        "{}?start_date={}&end_date={}&api_key={}",
        NEO_FEED_ENDPOINT,
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d"),
        api_key.unwrap_or(DEMO_API_KEY)
    )
}

pub fn earthquake_url(query: &SeismicQuery) -> String {
    format!(
        "{}?format=geojson&latitude={}&longitude={}&maxradiuskm={}&minmagnitude={}&limit={}",
        EARTHQUAKE_ENDPOINT,
        query.center.latitude,
        query.center.longitude,
        query.radius_km,
        query.min_magnitude,
        EARTHQUAKE_EVENT_LIMIT
    )
}

pub fn elevation_url(location: Location) -> String {
    format!(
        "{}?x={}&y={}&units=Meters&output=json",
        ELEVATION_ENDPOINT, location.longitude, location.latitude
    )
}

#[derive(Deserialize)]
struct NeoFeed {
    near_earth_objects: BTreeMap<String, Vec<NeoObject>>,
}

#[derive(Deserialize)]
struct NeoObject {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    neo_reference_id: Option<String>,
    name: String,
    estimated_diameter: EstimatedDiameter,
    #[serde(default)]
    is_potentially_hazardous_asteroid: bool,
    close_approach_data: Vec<CloseApproach>,
}

#[derive(Deserialize)]
struct EstimatedDiameter {
    kilometers: DiameterRange,
}

#[derive(Deserialize)]
struct DiameterRange {
    estimated_diameter_max: f64,
}

#[derive(Deserialize)]
struct CloseApproach {
    close_approach_date: String,
    relative_velocity: RelativeVelocity,
    miss_distance: MissDistance,
}

#[derive(Deserialize)]
struct RelativeVelocity {
    kilometers_per_hour: Value,
}

#[derive(Deserialize)]
struct MissDistance {
    kilometers: Value,
}

pub fn parse_neo_feed(body: &str) -> Result<Vec<CatalogObject>, UpstreamDataUnavailable> {
    let source = DataSource::AsteroidCatalog;
    let feed: NeoFeed = serde_json::from_str(body).map_err(|e| invalid(source, e.to_string()))?;

    let mut objects = Vec::new();
    for (date, entries) in feed.near_earth_objects {
        for entry in entries {
            let approach = entry.close_approach_data.first().ok_or_else(|| {
                invalid(source, format!("{} has no close approach data", entry.name))
            })?;

            objects.push(CatalogObject {
                id: entry
                    .id
                    .or(entry.neo_reference_id)
                    .unwrap_or_else(|| entry.name.clone()),
                diameter_km: entry.estimated_diameter.kilometers.estimated_diameter_max,
                velocity_km_h: number(source, &approach.relative_velocity.kilometers_per_hour)?,
                miss_distance_km: number(source, &approach.miss_distance.kilometers)?,
                approach_date: if approach.close_approach_date.is_empty() {
                    date.clone()
                } else {
                    approach.close_approach_date.clone()
                },
                hazardous: entry.is_potentially_hazardous_asteroid,
                name: entry.name,
            });
        }
    }

    Ok(objects)
}

#[derive(Deserialize)]
struct EventCollection {
    features: Vec<EventFeature>,
}

#[derive(Deserialize)]
struct EventFeature {
    properties: EventProperties,
    #[serde(default)]
    geometry: Option<EventGeometry>,
}

/// GeoJSON point: longitude, latitude, depth.
#[derive(Deserialize)]
struct EventGeometry {
    coordinates: Vec<f64>,
}

#[derive(Deserialize)]
struct EventProperties {
    mag: Option<f64>,
    place: Option<String>,
}

/// Summarises the events that fall inside `query`. Events without a
/// geometry are trusted to match the query that produced them.
pub fn parse_seismic_events(
    body: &str,
    query: &SeismicQuery,
) -> Result<SeismicitySummary, UpstreamDataUnavailable> {
    let events: EventCollection = serde_json::from_str(body)
        .map_err(|e| invalid(DataSource::Geological, e.to_string()))?;

    let matching: Vec<&EventFeature> = events
        .features
        .iter()
        .filter(|feature| {
            let within_radius = match feature.geometry.as_ref().map(|g| g.coordinates.as_slice()) {
                Some([longitude, latitude, ..]) => {
                    query.center.distance_km(&Location::new(*latitude, *longitude))
                        <= query.radius_km
                }
                _ => true,
            };
            let strong_enough = feature
                .properties
                .mag
                .map_or(true, |mag| mag >= query.min_magnitude);
            within_radius && strong_enough
        })
        .collect();

    let mut magnitudes = Vec::new();
    let mut strongest: Option<(f64, Option<String>)> = None;
    for feature in &matching {
        if let Some(mag) = feature.properties.mag {
            magnitudes.push(mag);
            if strongest.as_ref().map_or(true, |(best, _)| mag > *best) {
                strongest = Some((mag, feature.properties.place.clone()));
            }
        }
    }

    let mean_magnitude = if magnitudes.is_empty() {
        None
    } else {
        Some(magnitudes.iter().sum::<f64>() / magnitudes.len() as f64)
    };

    Ok(SeismicitySummary {
        event_count: matching.len(),
        max_magnitude: strongest.as_ref().map(|(mag, _)| *mag),
        mean_magnitude,
        strongest_event_place: strongest.and_then(|(_, place)| place),
    })
}

#[derive(Deserialize)]
struct ElevationResponse {
    #[serde(rename = "USGS_Elevation_Point_Query_Service")]
    service: ElevationService,
}

#[derive(Deserialize)]
struct ElevationService {
    #[serde(rename = "Elevation_Query")]
    query: ElevationQuery,
}

#[derive(Deserialize)]
struct ElevationQuery {
    #[serde(rename = "Elevation")]
    elevation: Value,
}

pub fn parse_elevation(body: &str) -> Result<f64, UpstreamDataUnavailable> {
    let source = DataSource::Geological;
    let response: ElevationResponse =
        serde_json::from_str(body).map_err(|e| invalid(source, e.to_string()))?;
    let elevation = number(source, &response.service.query.elevation)?;
    if !(MIN_ELEVATION_M..=MAX_ELEVATION_M).contains(&elevation) {
        return Err(invalid(source, format!("no elevation data ({} m)", elevation)));
    }
    Ok(elevation)
}

/// NeoWs sends most numbers as strings.
fn number(source: DataSource, value: &Value) -> Result<f64, UpstreamDataUnavailable> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid(source, format!("expected a number, got {}", value)))
}

fn invalid(data_source: DataSource, reason: String) -> UpstreamDataUnavailable {
    UpstreamDataUnavailable::InvalidResponse {
        data_source,
        reason,
    }
}
