//! Flux to luminosity conversion and phase bookkeeping
//!
//! L = 4π d² F with d in centimeters. Uncertainty propagation treats flux
//! and distance as independent:
//!
//! σ_L² = (4π d² σ_F)² + (8π F d σ_d)²

use std::f64::consts::PI;

/// Convert a bolometric (or quasi-bolometric) flux to a luminosity.
///
/// # Arguments
/// * `flux` - Flux in erg s⁻¹ cm⁻² with its 1-σ uncertainty
/// * `distance_cm` - Distance in centimeters with its 1-σ uncertainty
///
/// # Returns
/// `(luminosity, luminosity_err)` in erg s⁻¹.
pub fn luminosity(flux: f64, flux_err: f64, distance_cm: f64, distance_cm_err: f64) -> (f64, f64) {
    let lum = 4.0 * PI * distance_cm * distance_cm * flux;
    let err = ((4.0 * PI * distance_cm * distance_cm * flux_err).powi(2)
        + (8.0 * PI * flux * distance_cm * distance_cm_err).powi(2))
    .sqrt();
    (lum, err)
}

/// Days elapsed since explosion.
///
/// The explosion-epoch uncertainty comes from the parameter table and is
/// carried unchanged as the phase uncertainty of every light-curve point.
pub fn phase(jd: f64, explosion_jd: f64, explosion_jd_err: f64) -> (f64, f64) {
    (jd - explosion_jd, explosion_jd_err)
}
