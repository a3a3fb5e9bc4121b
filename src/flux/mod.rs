//! Magnitude to monochromatic flux conversion
//!
//! Converts a broadband magnitude and its uncertainty into a flux density at
//! the filter's effective wavelength, using the filter's flux zero-point:
//!
//! F = F₀ · 10^(−0.4 m),  σ_F = F · 0.4 ln(10) · σ_m

use crate::constants::MAG_FLUX_SLOPE;

/// Convert a magnitude to a monochromatic flux density.
///
/// # Arguments
/// * `magnitude` - Apparent magnitude in the filter's system
/// * `magnitude_err` - 1-σ magnitude uncertainty
/// * `flux_zeropoint` - Flux at magnitude zero, erg s⁻¹ cm⁻² Å⁻¹
///
/// # Returns
/// `(flux, flux_err)` in erg s⁻¹ cm⁻² Å⁻¹. NaN inputs pass through as NaN;
/// this function never panics.
pub fn mag_to_flux(magnitude: f64, magnitude_err: f64, flux_zeropoint: f64) -> (f64, f64) {
    let flux = flux_zeropoint * 10.0_f64.powf(-0.4 * magnitude);
    let flux_err = flux * MAG_FLUX_SLOPE * magnitude_err;
    (flux, flux_err)
}

/// Invert [`mag_to_flux`]: recover a magnitude from a flux density.
pub fn flux_to_mag(flux: f64, flux_zeropoint: f64) -> f64 {
    -2.5 * (flux / flux_zeropoint).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Bessell V-band zero-point, erg s⁻¹ cm⁻² Å⁻¹
    const V_ZEROPOINT: f64 = 3.631e-9;

    #[test]
    fn test_zero_magnitude_gives_zeropoint() {
        let (flux, _) = mag_to_flux(0.0, 0.0, V_ZEROPOINT);
        assert_relative_eq!(flux, V_ZEROPOINT, epsilon = 1e-20);
    }

    #[test]
    fn test_five_magnitudes_is_factor_100() {
        let (bright, _) = mag_to_flux(10.0, 0.0, V_ZEROPOINT);
        let (faint, _) = mag_to_flux(15.0, 0.0, V_ZEROPOINT);
        assert_relative_eq!(bright / faint, 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_roundtrip_over_astrophysical_range() {
        // -5 (bright nova) to 25 (faint transient)
        let mut m = -5.0;
        while m <= 25.0 {
            let (flux, _) = mag_to_flux(m, 0.0, V_ZEROPOINT);
            assert_relative_eq!(flux_to_mag(flux, V_ZEROPOINT), m, epsilon = 1e-10);
            m += 0.25;
        }
    }

    #[test]
    fn test_uncertainty_propagation() {
        let (flux, flux_err) = mag_to_flux(15.0, 0.05, V_ZEROPOINT);
        let expected = flux * 10.0_f64.ln() * 0.4 * 0.05;
        assert_relative_eq!(flux_err, expected, max_relative = 1e-10);
    }

    #[test]
    fn test_nan_passthrough() {
        let (flux, flux_err) = mag_to_flux(f64::NAN, 0.05, V_ZEROPOINT);
        assert!(flux.is_nan());
        assert!(flux_err.is_nan());
    }
}
