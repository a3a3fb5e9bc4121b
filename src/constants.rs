//! Physical and catalog constants used across the crate
//!
//! All radiative quantities are CGS: wavelengths handled in Ångströms at the
//! API surface, converted to centimeters inside the Planck routines, fluxes
//! in erg s⁻¹ cm⁻² Å⁻¹, distances in centimeters.

/// Planck constant in erg·s (CODATA 2018 exact)
pub const H_PLANCK: f64 = 6.626_070_15e-27;

/// Speed of light in cm/s (exact)
pub const C_LIGHT: f64 = 2.997_924_58e10;

/// Boltzmann constant in erg/K (CODATA 2018 exact)
pub const K_BOLTZMANN: f64 = 1.380_649e-16;

/// Stefan–Boltzmann constant in erg cm⁻² s⁻¹ K⁻⁴
pub const SIGMA_SB: f64 = 5.670_374_419e-5;

/// Centimeters per Ångström
pub const CM_PER_ANGSTROM: f64 = 1.0e-8;

/// Centimeters per megaparsec (IAU parsec)
pub const CM_PER_MPC: f64 = 3.085_677_58e24;

/// Shortest filter effective wavelength the reddening model supports (Å)
///
/// Corresponds to x = 11.0 inverse microns, the blue end of the CCM89
/// parameterization used here.
pub const MIN_MODEL_WAVELENGTH: f64 = 909.09;

/// Longest filter effective wavelength the reddening model supports (Å)
///
/// Corresponds to x = 0.3 inverse microns, the red end of CCM89.
pub const MAX_MODEL_WAVELENGTH: f64 = 33_333.33;

/// ln(10) · 0.4, the magnitude-to-flux logarithmic slope
pub const MAG_FLUX_SLOPE: f64 = 0.921_034_037_197_618_3;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mag_flux_slope_value() {
        assert_relative_eq!(MAG_FLUX_SLOPE, 0.4 * 10.0_f64.ln(), epsilon = 1e-15);
    }

    #[test]
    fn test_wavelength_window_inverse_microns() {
        // Window endpoints are defined by the reddening law's x-range
        assert_relative_eq!(1.0e4 / MIN_MODEL_WAVELENGTH, 11.0, epsilon = 1e-3);
        assert_relative_eq!(1.0e4 / MAX_MODEL_WAVELENGTH, 0.3, epsilon = 1e-5);
    }
}
