//! Color-based bolometric corrections
//!
//! Implements the bolometric-correction calibrations of Bersten & Hamuy
//! 2009 (2009ApJ...701..200B): polynomials in a two-filter color giving the
//! correction from the V magnitude to the bolometric magnitude, valid over
//! the color range each fit was calibrated on. Only the B−V, V−I and B−I
//! colors are calibrated; anything else is unsupported.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::constants::MAG_FLUX_SLOPE;

/// Zero point of the bolometric magnitude scale (Bersten & Hamuy 2009,
/// eq. 2): F_bol = 10^(−0.4 (m_bol + 11.64)) erg s⁻¹ cm⁻².
pub const BOLOMETRIC_ZEROPOINT_MAG: f64 = 11.64;

/// One calibrated color: polynomial coefficients (ascending powers) and
/// the color range the fit is valid over.
#[derive(Debug, Clone, Copy)]
pub struct ColorCalibration {
    /// Human-readable color designation ("B-V")
    pub color: &'static str,
    /// Polynomial coefficients, constant term first
    pub coefficients: &'static [f64],
    /// Bluest color the calibration covers
    pub range_min: f64,
    /// Reddest color the calibration covers
    pub range_max: f64,
}

static CALIBRATIONS: Lazy<HashMap<(&'static str, &'static str), ColorCalibration>> =
    Lazy::new(|| {
        HashMap::from([
            (
                ("B", "V"),
                ColorCalibration {
                    color: "B-V",
                    coefficients: &[-0.823, 5.027, -13.409, 20.133, -18.096, 9.084, -1.950],
                    range_min: -0.2,
                    range_max: 1.65,
                },
            ),
            (
                ("V", "I"),
                ColorCalibration {
                    color: "V-I",
                    coefficients: &[-1.355, 6.262, -2.676, -22.973, 35.524, -15.340],
                    range_min: -0.1,
                    range_max: 1.0,
                },
            ),
            (
                ("B", "I"),
                ColorCalibration {
                    color: "B-I",
                    coefficients: &[-1.096, 3.038, -2.246, -0.497, 0.7078, 0.576, -0.713, 0.239, -0.027],
                    range_min: -0.4,
                    range_max: 3.0,
                },
            ),
        ])
    });

/// Look up the calibration for a filter pair.
///
/// Returns `None` for any pair outside the supported set
/// {(B,V), (V,I), (B,I)} — the pair order matters, the color is
/// `filter1` − `filter2`.
pub fn calibration_for(filter1: &str, filter2: &str) -> Option<&'static ColorCalibration> {
    CALIBRATIONS
        .iter()
        .find(|((f1, f2), _)| *f1 == filter1 && *f2 == filter2)
        .map(|(_, cal)| cal)
}

/// Evaluate the bolometric correction at a color.
///
/// Returns `(bc, bc_err)` with the uncertainty propagated through the
/// polynomial derivative, or `None` when the color falls outside the
/// calibration's validity range (the calling epoch is skipped).
pub fn bolometric_correction(
    calibration: &ColorCalibration,
    color: f64,
    color_err: f64,
) -> Option<(f64, f64)> {
    if color < calibration.range_min || color > calibration.range_max {
        return None;
    }
    let bc = polynomial(calibration.coefficients, color);
    let slope = polynomial_derivative(calibration.coefficients, color);
    Some((bc, (slope * color_err).abs()))
}

/// Bolometric flux from the V magnitude and a bolometric correction.
///
/// m_bol = V + BC, F_bol = 10^(−0.4 (m_bol + 11.64)) erg s⁻¹ cm⁻²; the
/// magnitude uncertainties combine in quadrature and propagate through the
/// exponential.
pub fn bolometric_flux(bc: f64, bc_err: f64, v_mag: f64, v_mag_err: f64) -> (f64, f64) {
    let mbol = v_mag + bc;
    let mbol_err = (bc_err * bc_err + v_mag_err * v_mag_err).sqrt();
    let flux = 10.0_f64.powf(-0.4 * (mbol + BOLOMETRIC_ZEROPOINT_MAG));
    let flux_err = flux * MAG_FLUX_SLOPE * mbol_err;
    (flux, flux_err)
}

/// Horner evaluation, constant term first.
fn polynomial(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Derivative of [`polynomial`] at `x`.
fn polynomial_derivative(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(0.0, |acc, (k, &c)| acc * x + k as f64 * c)
}
