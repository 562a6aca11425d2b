// Physical Constants
pub const GRAVITY: f64 = 9.81; // m/s²
pub const EARTH_RADIUS_KM: f64 = 6_371.0; // km
pub const JOULES_PER_MEGATON: f64 = 4.184e15; // J per megaton TNT

// Composition densities
pub const ROCKY_DENSITY: f64 = 3_000.0; // kg/m³
pub const METALLIC_DENSITY: f64 = 7_800.0; // kg/m³
pub const CARBONACEOUS_DENSITY: f64 = 1_500.0; // kg/m³
pub const POROUS_DENSITY: f64 = 1_000.0; // kg/m³

// Entry Parameters
pub const ENTRY_ALTITUDE: f64 = 120.0; // km
pub const TIME_STEP: f64 = 0.5; // s
pub const DENSITY_SCALE_HEIGHT: f64 = 10.0; // km
pub const DRAG_RATE: f64 = 0.01; // 1/s at full density factor
pub const ABLATION_RATE: f64 = 0.04; // 1/s at full density factor and initial speed
pub const AIRBURST_MASS_FRACTION: f64 = 0.05;
pub const MAX_ENTRY_STEPS: usize = 20_000;

// Crater scaling: D_km = CRATER_COEFFICIENT * E_J^CRATER_ENERGY_EXPONENT * sin(angle)^CRATER_ANGLE_EXPONENT
// Energy term follows the pi-group fit (E * 1e-12)^(1/3.4) * 0.05 folded into one coefficient,
// angle term is the Collins et al. (2005) sin^(1/3) correction.
pub const CRATER_COEFFICIENT: f64 = 1.478e-5;
pub const CRATER_ENERGY_EXPONENT: f64 = 1.0 / 3.4;
pub const CRATER_ANGLE_EXPONENT: f64 = 1.0 / 3.0;

// Blast scaling: R_km = BLAST_COEFFICIENT * E_Mt^BLAST_ENERGY_EXPONENT * ring_factor
pub const BLAST_COEFFICIENT: f64 = 0.28;
pub const BLAST_ENERGY_EXPONENT: f64 = 1.0 / 3.0;

// Seismic: M = 2/3 * log10(E_J) + SEISMIC_MAGNITUDE_OFFSET (seismic efficiency 1e-4 folded in)
pub const SEISMIC_MAGNITUDE_OFFSET: f64 = -5.87;

// Severity thresholds (megatons)
pub const MODERATE_THRESHOLD_MT: f64 = 1.0;
pub const SEVERE_THRESHOLD_MT: f64 = 10.0;
pub const CATASTROPHIC_THRESHOLD_MT: f64 = 100.0;

// Economic Constants (USD)
pub const GLOBAL_GDP_PER_CAPITA: f64 = 12_000.0;
pub const RECOVERY_YEARS: f64 = 10.0;
pub const PER_CAPITA_RECOVERY_COST: f64 = GLOBAL_GDP_PER_CAPITA * RECOVERY_YEARS;
pub const CRATER_ZONE_COST_MULTIPLIER: f64 = 5.0;
pub const RESPONSE_COST_FRACTION: f64 = 0.3;

// Demographic Constants
pub const GLOBAL_AVERAGE_DENSITY: f64 = 15.0; // people/km²

// Data source budgets (ms)
pub const CATALOG_TIMEOUT_MS: u64 = 15_000;
pub const GEOLOGICAL_TIMEOUT_MS: u64 = 10_000;
pub const POPULATION_TIMEOUT_MS: u64 = 8_000;
pub const CATALOG_WINDOW_DAYS: i64 = 7;
pub const MAX_CATALOG_WINDOW_DAYS: i64 = 3_660; // ten years
pub const SEISMIC_SEARCH_RADIUS_KM: f64 = 100.0;
pub const SEISMIC_MIN_MAGNITUDE: f64 = 4.0;
