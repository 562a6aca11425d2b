use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_KM;
use crate::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
        }
    }

    /// Builds a location and rejects coordinates outside -90..90 / -180..180.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, SimulationError> {
        let location = Location::new(latitude, longitude);
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(SimulationError::InvalidInput(format!(
                "latitude must be within -90..90, got {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(SimulationError::InvalidInput(format!(
                "longitude must be within -180..180, got {}",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_checked_accepts_bounds() {
        assert!(Location::checked(90.0, 180.0).is_ok());
        assert!(Location::checked(-90.0, -180.0).is_ok());
        assert!(Location::checked(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(matches!(
            Location::checked(90.5, 0.0),
            Err(SimulationError::InvalidInput(_))
        ));
        assert!(matches!(
            Location::checked(0.0, -181.0),
            Err(SimulationError::InvalidInput(_))
        ));
        assert!(Location::checked(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_distance_london_new_york() {
        let london = Location::new(51.5074, -0.1278);
        let new_york = Location::new(40.7128, -74.0060);

        // ~5570 km
        assert_abs_diff_eq!(london.distance_km(&new_york), 5570.0, epsilon = 15.0);
        assert_abs_diff_eq!(london.distance_km(&london), 0.0, epsilon = 1e-9);
    }
}
