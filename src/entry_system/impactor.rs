use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{CARBONACEOUS_DENSITY, METALLIC_DENSITY, POROUS_DENSITY, ROCKY_DENSITY};
use crate::errors::SimulationError;
use crate::fusion_system::sources::CatalogObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composition {
    Rocky,
    Metallic,
    Carbonaceous,
    Porous,
}

impl Composition {
    pub fn density(&self) -> f64 {
        match self {
            Composition::Rocky => ROCKY_DENSITY,
            Composition::Metallic => METALLIC_DENSITY,
            Composition::Carbonaceous => CARBONACEOUS_DENSITY,
            Composition::Porous => POROUS_DENSITY,
        }
    }
}

/// Physical description of the incoming body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactorSpec {
    pub diameter_m: f64,
    pub velocity_km_s: f64,
    pub density_kg_m3: f64,
    /// Measured from the horizontal
    pub entry_angle_deg: f64,
}

impl ImpactorSpec {
    pub fn new(
        diameter_m: f64,
        velocity_km_s: f64,
        density_kg_m3: f64,
        entry_angle_deg: f64,
    ) -> Self {
        ImpactorSpec {
            diameter_m,
            velocity_km_s,
            density_kg_m3,
            entry_angle_deg,
        }
    }

    pub fn from_composition(
        diameter_m: f64,
        velocity_km_s: f64,
        composition: Composition,
        entry_angle_deg: f64,
    ) -> Self {
        Self::new(
            diameter_m,
            velocity_km_s,
            composition.density(),
            entry_angle_deg,
        )
    }

    /// Catalog objects report kilometres and km/h.
    pub fn from_catalog_object(
        object: &CatalogObject,
        composition: Composition,
        entry_angle_deg: f64,
    ) -> Self {
        Self::from_composition(
            object.diameter_km * 1000.0,
            object.velocity_km_h / 3600.0,
            composition,
            entry_angle_deg,
        )
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.diameter_m > 0.0 && self.diameter_m.is_finite()) {
            return Err(SimulationError::InvalidInput(format!(
                "diameter_m must be positive, got {}",
                self.diameter_m
            )));
        }
        if !(self.velocity_km_s > 0.0 && self.velocity_km_s.is_finite()) {
            return Err(SimulationError::InvalidInput(format!(
                "velocity_km_s must be positive, got {}",
                self.velocity_km_s
            )));
        }
        if !(self.density_kg_m3 > 0.0 && self.density_kg_m3.is_finite()) {
            return Err(SimulationError::InvalidInput(format!(
                "density_kg_m3 must be positive, got {}",
                self.density_kg_m3
            )));
        }
        // A horizontal path never reaches the ground.
        if !(self.entry_angle_deg > 0.0 && self.entry_angle_deg <= 90.0) {
            return Err(SimulationError::InvalidInput(format!(
                "entry_angle_deg must be within (0, 90], got {}",
                self.entry_angle_deg
            )));
        }
        Ok(())
    }

    pub fn volume_m3(&self) -> f64 {
        let radius = self.diameter_m / 2.0;
        4.0 / 3.0 * PI * radius.powi(3)
    }

    pub fn mass_kg(&self) -> f64 {
        self.volume_m3() * self.density_kg_m3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mass_of_sphere() {
        let spec = ImpactorSpec::new(20.0, 19.0, 3000.0, 18.0);
        // 4/3 * pi * 10^3 * 3000
        assert_relative_eq!(spec.mass_kg(), 1.2566e7, max_relative = 1e-3);
    }

    #[test]
    fn test_composition_densities() {
        assert_eq!(Composition::Rocky.density(), 3000.0);
        assert_eq!(Composition::Metallic.density(), 7800.0);
        assert_eq!(Composition::Carbonaceous.density(), 1500.0);
        assert_eq!(Composition::Porous.density(), 1000.0);

        let spec = ImpactorSpec::from_composition(50.0, 12.0, Composition::Metallic, 45.0);
        assert_eq!(spec.density_kg_m3, 7800.0);
    }

    #[test]
    fn test_validate_rejects_non_positive_inputs() {
        assert!(ImpactorSpec::new(0.0, 19.0, 3000.0, 45.0).validate().is_err());
        assert!(ImpactorSpec::new(20.0, -1.0, 3000.0, 45.0).validate().is_err());
        assert!(ImpactorSpec::new(20.0, 19.0, 0.0, 45.0).validate().is_err());
        assert!(ImpactorSpec::new(20.0, 19.0, 3000.0, 0.0).validate().is_err());
        assert!(ImpactorSpec::new(20.0, 19.0, 3000.0, 91.0).validate().is_err());
        assert!(ImpactorSpec::new(f64::NAN, 19.0, 3000.0, 45.0)
            .validate()
            .is_err());
        assert!(ImpactorSpec::new(20.0, 19.0, 3000.0, 90.0).validate().is_ok());
    }

    #[test]
    fn test_from_catalog_object_converts_units() {
        let object = CatalogObject {
            id: "2099942".to_string(),
            name: "99942 Apophis (2004 MN4)".to_string(),
            diameter_km: 0.37,
            velocity_km_h: 26_640.0,
            miss_distance_km: 38_017.0,
            approach_date: "2029-04-13".to_string(),
            hazardous: true,
        };
        let spec = ImpactorSpec::from_catalog_object(&object, Composition::Rocky, 45.0);

        assert_relative_eq!(spec.diameter_m, 370.0, epsilon = 1e-9);
        assert_relative_eq!(spec.velocity_km_s, 7.4, epsilon = 1e-9);
        assert_eq!(spec.density_kg_m3, 3000.0);
    }
}
