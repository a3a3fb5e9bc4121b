//! Interstellar extinction corrections
//!
//! Implements the Cardelli, Clayton & Mathis (1989) mean extinction law
//! (1989ApJ...345..245C) at R_V = 3.1 for flux-domain dereddening, and the
//! CCM89 Table 3 band coefficients for magnitude-domain dereddening of the
//! standard UBVRI bands.
//!
//! Both corrections use the total visual extinction Av_gal + Av_host; the
//! galactic and host contributions are never separated after summation.

use crate::photometry::{FluxPoint, Observation};
use crate::units::angstrom_to_inverse_micron;

/// Ratio of total to selective extinction for the diffuse ISM
pub const R_V: f64 = 3.1;

/// A(band)/A(V) for the standard optical bands (CCM89, Table 3).
pub const UBVRI_EXTINCTION: &[(&str, f64)] = &[
    ("U", 1.569),
    ("B", 1.337),
    ("V", 1.0),
    ("R", 0.751),
    ("I", 0.479),
];

/// Look up the tabulated A(band)/A(V) coefficient for a named band.
pub fn ubvri_coefficient(name: &str) -> Option<f64> {
    UBVRI_EXTINCTION
        .iter()
        .find(|(band, _)| *band == name)
        .map(|(_, coeff)| *coeff)
}

/// A(λ)/A(V) from the CCM89 law at R_V = 3.1.
///
/// `wavelength` is in Ångströms and must lie in the law's valid range,
/// x = 1/λ ∈ [0.3, 11.0] inverse microns (909.09 Å … 33333.33 Å) — the
/// same window applied when flux points are built.
pub fn ccm89_alav(wavelength: f64) -> f64 {
    let x = angstrom_to_inverse_micron(wavelength);
    assert!(
        (0.3..=11.0).contains(&x),
        "wavelength {wavelength} Å is outside the CCM89 range"
    );

    let (a, b) = if x < 1.1 {
        ccm89_infrared(x)
    } else if x < 3.3 {
        ccm89_optical(x)
    } else if x < 8.0 {
        ccm89_ultraviolet(x)
    } else {
        ccm89_far_ultraviolet(x)
    };

    a + b / R_V
}

/// Multiplicative flux factor that removes A_V magnitudes of extinction at
/// the given wavelength: 10^(0.4 · A_V · A(λ)/A(V)).
///
/// Greater than 1 for positive extinction.
pub fn reddening_factor(wavelength: f64, av_total: f64) -> f64 {
    10.0_f64.powf(0.4 * av_total * ccm89_alav(wavelength))
}

/// Deredden flux points in place using the CCM89 law.
///
/// The factor is exact at each wavelength, so flux and uncertainty scale
/// together.
pub fn deredden_fluxes(points: &mut [FluxPoint], av_total: f64) {
    for point in points.iter_mut() {
        let factor = reddening_factor(point.wavelength, av_total);
        point.flux *= factor;
        point.flux_err *= factor;
    }
}

/// Deredden UBVRI magnitudes in place using the tabulated coefficients.
///
/// Only the five standard optical bands are corrected; observations in any
/// other band are left untouched.
pub fn deredden_ubvri_magnitudes(observations: &mut [Observation], av_total: f64) {
    for obs in observations.iter_mut() {
        if let Some(coeff) = ubvri_coefficient(&obs.filter.name) {
            obs.magnitude -= coeff * av_total;
        }
    }
}

/// CCM89 infrared segment, 0.3 ≤ x < 1.1
fn ccm89_infrared(x: f64) -> (f64, f64) {
    let t = x.powf(1.61);
    (0.574 * t, -0.527 * t)
}

/// CCM89 optical/NIR segment, 1.1 ≤ x < 3.3
fn ccm89_optical(x: f64) -> (f64, f64) {
    let y = x - 1.82;
    // Horner's method
    let a = 1.0
        + y * (0.17699
            + y * (-0.50447
                + y * (-0.02427
                    + y * (0.72085 + y * (0.01979 + y * (-0.77530 + y * 0.32999))))));
    let b = y
        * (1.41338
            + y * (2.28305
                + y * (1.07233
                    + y * (-5.38434 + y * (-0.62251 + y * (5.30260 + y * -2.09002))))));
    (a, b)
}

/// CCM89 ultraviolet segment, 3.3 ≤ x < 8.0
fn ccm89_ultraviolet(x: f64) -> (f64, f64) {
    let (fa, fb) = if x >= 5.9 {
        let y = x - 5.9;
        (
            -0.04473 * y * y - 0.009779 * y * y * y,
            0.2130 * y * y + 0.1207 * y * y * y,
        )
    } else {
        (0.0, 0.0)
    };

    let a = 1.752 - 0.316 * x - 0.104 / ((x - 4.67).powi(2) + 0.341) + fa;
    let b = -3.090 + 1.825 * x + 1.206 / ((x - 4.62).powi(2) + 0.263) + fb;
    (a, b)
}

/// CCM89 far-ultraviolet segment, 8.0 ≤ x ≤ 11.0
fn ccm89_far_ultraviolet(x: f64) -> (f64, f64) {
    let y = x - 8.0;
    let a = -1.073 + y * (-0.628 + y * (0.137 + y * -0.070));
    let b = 13.670 + y * (4.257 + y * (-0.420 + y * 0.374));
    (a, b)
}
