use crate::constants::DENSITY_SCALE_HEIGHT;

/// Exponential density proxy driving drag and ablation.
///
/// `1 - e^(-altitude / scale_height)`, altitude in km. Not a physical
/// density table: 0 at the surface, approaching 1 at entry altitude.
pub fn density_factor(altitude_km: f64) -> f64 {
    if altitude_km <= 0.0 {
        return 0.0;
    }
    1.0 - (-altitude_km / DENSITY_SCALE_HEIGHT).exp()
}
