use serde::{Deserialize, Serialize};

use crate::constants::{
    BLAST_COEFFICIENT, BLAST_ENERGY_EXPONENT, CRATER_ANGLE_EXPONENT, CRATER_COEFFICIENT,
    CRATER_ENERGY_EXPONENT, JOULES_PER_MEGATON, SEISMIC_MAGNITUDE_OFFSET,
};
use crate::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlastRingSpec {
    pub overpressure_kpa: f64,
    pub ring_factor: f64,
    pub description: &'static str,
}

/// Damage thresholds from the innermost ring outwards.
pub const BLAST_RING_SPECS: [BlastRingSpec; 4] = [
    BlastRingSpec {
        overpressure_kpa: 140.0,
        ring_factor: 0.55,
        description: "total destruction of reinforced structures",
    },
    BlastRingSpec {
        overpressure_kpa: 50.0,
        ring_factor: 1.0,
        description: "severe structural damage",
    },
    BlastRingSpec {
        overpressure_kpa: 20.0,
        ring_factor: 1.9,
        description: "moderate damage",
    },
    BlastRingSpec {
        overpressure_kpa: 5.0,
        ring_factor: 4.6,
        description: "glass breakage",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlastRing {
    pub radius_km: f64,
    pub overpressure_kpa: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceMetrics {
    pub energy_joules: f64,
    pub energy_megatons: f64,
    pub crater_diameter_km: f64,
    /// Sorted outward: increasing radius, decreasing overpressure
    pub blast_rings: Vec<BlastRing>,
    pub seismic_magnitude: f64,
}

impl ConsequenceMetrics {
    pub fn outermost_ring(&self) -> Option<&BlastRing> {
        self.blast_rings.last()
    }

    pub fn crater_area_km2(&self) -> f64 {
        std::f64::consts::PI * (self.crater_diameter_km / 2.0).powi(2)
    }
}

pub struct ConsequenceCalculator;

impl ConsequenceCalculator {
    pub fn calculate(
        terminal_mass_kg: f64,
        terminal_velocity_m_s: f64,
        entry_angle_deg: f64,
    ) -> Result<ConsequenceMetrics, SimulationError> {
        if !(terminal_mass_kg > 0.0 && terminal_mass_kg.is_finite()) {
            return Err(SimulationError::DegenerateImpact(format!(
                "terminal mass is {} kg, body fully ablated",
                terminal_mass_kg
            )));
        }
        if !(terminal_velocity_m_s > 0.0 && terminal_velocity_m_s.is_finite()) {
            return Err(SimulationError::DegenerateImpact(format!(
                "terminal velocity is {} m/s",
                terminal_velocity_m_s
            )));
        }
        if !(entry_angle_deg > 0.0 && entry_angle_deg <= 90.0) {
            return Err(SimulationError::InvalidInput(format!(
                "entry_angle_deg must be within (0, 90], got {}",
                entry_angle_deg
            )));
        }

        let energy_joules = Self::kinetic_energy(terminal_mass_kg, terminal_velocity_m_s);
        let energy_megatons = energy_joules / JOULES_PER_MEGATON;

        Ok(ConsequenceMetrics {
            energy_joules,
            energy_megatons,
            crater_diameter_km: Self::crater_diameter(energy_joules, entry_angle_deg),
            blast_rings: Self::blast_rings(energy_megatons),
            seismic_magnitude: Self::seismic_magnitude(energy_joules)?,
        })
    }

    pub fn kinetic_energy(mass_kg: f64, velocity_m_s: f64) -> f64 {
        0.5 * mass_kg * velocity_m_s.powi(2)
    }

    pub fn crater_diameter(energy_joules: f64, entry_angle_deg: f64) -> f64 {
        let angle_factor = entry_angle_deg
            .to_radians()
            .sin()
            .max(0.0)
            .powf(CRATER_ANGLE_EXPONENT);
        CRATER_COEFFICIENT * energy_joules.max(0.0).powf(CRATER_ENERGY_EXPONENT) * angle_factor
    }

    pub fn blast_rings(energy_megatons: f64) -> Vec<BlastRing> {
        let base_radius = BLAST_COEFFICIENT * energy_megatons.max(0.0).powf(BLAST_ENERGY_EXPONENT);

        BLAST_RING_SPECS
            .iter()
            .map(|ring| BlastRing {
                radius_km: base_radius * ring.ring_factor,
                overpressure_kpa: ring.overpressure_kpa,
                description: ring.description.to_string(),
            })
            .collect()
    }

    pub fn seismic_magnitude(energy_joules: f64) -> Result<f64, SimulationError> {
        if !(energy_joules > 0.0) {
            return Err(SimulationError::DegenerateImpact(format!(
                "seismic magnitude undefined for energy {} J",
                energy_joules
            )));
        }
        Ok(2.0 / 3.0 * energy_joules.log10() + SEISMIC_MAGNITUDE_OFFSET)
    }
}
