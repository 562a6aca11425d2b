//! Reference data substituted when a source cannot answer.

use super::sources::{CatalogObject, GeologicalContext, SeismicitySummary};

/// Sea level; used when no elevation is known.
pub const FALLBACK_ELEVATION_M: f64 = 0.0;

/// Real near-Earth objects kept on hand for when the catalog is unreachable.
pub fn reference_catalog() -> Vec<CatalogObject> {
    vec![
        CatalogObject {
            id: "2099942".to_string(),
            name: "99942 Apophis (2004 MN4)".to_string(),
            diameter_km: 0.37,
            velocity_km_h: 26_640.0,
            miss_distance_km: 38_017.0,
            approach_date: "2029-04-13".to_string(),
            hazardous: true,
        },
        CatalogObject {
            id: "2186822".to_string(),
            name: "186822 (2004 FE31)".to_string(),
            diameter_km: 2.7,
            velocity_km_h: 25_000.0,
            miss_distance_km: 15_000_000.0,
            approach_date: "2025-10-04".to_string(),
            hazardous: false,
        },
        CatalogObject {
            id: "2024 TM3".to_string(),
            name: "2024 TM3".to_string(),
            diameter_km: 0.0298,
            velocity_km_h: 45_000.0,
            miss_distance_km: 54_723.0,
            approach_date: "2025-10-04".to_string(),
            hazardous: true,
        },
        CatalogObject {
            id: "2019 FT".to_string(),
            name: "2019 FT".to_string(),
            diameter_km: 0.025,
            velocity_km_h: 108_673.0,
            miss_distance_km: 6_800_000.0,
            approach_date: "2019-03-25".to_string(),
            hazardous: false,
        },
    ]
}

/// Looks an object up by id or by name.
pub fn find_catalog_object<'a>(objects: &'a [CatalogObject], key: &str) -> Option<&'a CatalogObject> {
    let key = key.trim();
    objects
        .iter()
        .find(|object| object.id == key || object.name.eq_ignore_ascii_case(key))
}

/// "No notable activity" placeholder.
pub fn reference_geology() -> GeologicalContext {
    GeologicalContext {
        seismicity: SeismicitySummary::quiet(),
        elevation_m: None,
    }
}
