//! Observed flux integration and UV/IR corrections
//!
//! Implements the direct-integration bolometric flux of Bersten & Hamuy
//! 2009 (2009ApJ...701..200B): the trapezoidal integral over the observed
//! wavelength range, an IR correction integrating the fitted blackbody
//! beyond the longest observed wavelength, and a UV correction that
//! integrates the blackbody below the shortest observed wavelength, unless
//! the U band sits below the model (a sign of line blanketing), in which
//! case the observed blue flux is extrapolated linearly to zero wavelength.

use crate::blackbody::{planck_flux_dtemperature, BlackbodyFit};
use crate::integrate::{adaptive_simpson, integrate_to_infinity, trapezoidal};
use crate::photometry::{EpochGroup, FluxPoint};

/// Relative accuracy target for the model-flux quadratures
const QUADRATURE_ACCURACY: f64 = 1.0e-10;

/// Number of shortest-wavelength points feeding the linear UV extrapolation
const UV_LINEAR_POINTS: usize = 3;

/// Observed (quasi-bolometric) flux: trapezoidal integral of flux versus
/// wavelength over the epoch's observed range, no extrapolation.
///
/// Returns `(flux, flux_err)` in erg s⁻¹ cm⁻².
pub fn observed_flux(group: &EpochGroup) -> (f64, f64) {
    let wavelengths: Vec<f64> = group.points.iter().map(|p| p.wavelength).collect();
    let fluxes: Vec<f64> = group.points.iter().map(|p| p.flux).collect();
    let flux_errs: Vec<f64> = group.points.iter().map(|p| p.flux_err).collect();
    trapezoidal(&wavelengths, &fluxes, &flux_errs)
}

/// Unobserved flux beyond the longest observed wavelength.
///
/// Integrates the fitted blackbody from `longest_wl` to infinity. The
/// uncertainty propagates the fit's temperature and angular-radius errors
/// through the analytic parameter derivatives, combined in quadrature.
pub fn ir_correction(fit: &BlackbodyFit, longest_wl: f64) -> (f64, f64) {
    let model = |wl: f64| fit.flux(wl);
    let dmodel_dt = |wl: f64| planck_flux_dtemperature(wl, fit.temperature, fit.angular_radius);

    let scale = fit.total_flux();
    let correction = integrate_to_infinity(&model, longest_wl, scale * QUADRATURE_ACCURACY);
    let dcorr_dt = integrate_to_infinity(
        &dmodel_dt,
        longest_wl,
        scale / fit.temperature * QUADRATURE_ACCURACY,
    );
    let dcorr_dradius = 2.0 * correction / fit.angular_radius;

    let err = ((dcorr_dt * fit.temperature_err).powi(2)
        + (dcorr_dradius * fit.angular_radius_err).powi(2))
    .sqrt();
    (correction, err)
}

/// Unobserved flux below the shortest observed wavelength, from the
/// blackbody model.
///
/// Integrates the fitted blackbody over [0, `shortest_wl`]; uncertainty
/// propagation as in [`ir_correction`].
pub fn uv_correction_blackbody(fit: &BlackbodyFit, shortest_wl: f64) -> (f64, f64) {
    let model = |wl: f64| fit.flux(wl);
    let dmodel_dt = |wl: f64| planck_flux_dtemperature(wl, fit.temperature, fit.angular_radius);

    let scale = fit.total_flux();
    let correction = adaptive_simpson(&model, 0.0, shortest_wl, scale * QUADRATURE_ACCURACY);
    let dcorr_dt = adaptive_simpson(
        &dmodel_dt,
        0.0,
        shortest_wl,
        scale / fit.temperature * QUADRATURE_ACCURACY,
    );
    let dcorr_dradius = 2.0 * correction / fit.angular_radius;

    let err = ((dcorr_dt * fit.temperature_err).powi(2)
        + (dcorr_dradius * fit.angular_radius_err).powi(2))
    .sqrt();
    (correction, err)
}

/// Unobserved flux below the shortest observed wavelength, from a linear
/// extrapolation of the bluest observed points down to zero flux at zero
/// wavelength.
///
/// A through-origin line f = bλ is least-squares fit to the (at most)
/// three shortest-wavelength points and integrated over [0, shortest_wl].
/// The integral is a linear functional of the point fluxes, so their
/// uncertainties propagate in quadrature through the fit coefficient.
/// With a single point this reduces to the triangle rule ½·λ·f.
///
/// `points` must be sorted ascending in wavelength.
pub fn uv_correction_linear(points: &[FluxPoint]) -> (f64, f64) {
    assert!(!points.is_empty(), "linear UV correction needs a flux point");
    let blue = &points[..points.len().min(UV_LINEAR_POINTS)];

    // Slope of the through-origin line: b = Σλf / Σλ²
    let sxx: f64 = blue.iter().map(|p| p.wavelength * p.wavelength).sum();
    let s = blue[0].wavelength;
    let half_s2 = s * s / 2.0;

    let mut integral = 0.0;
    let mut var = 0.0;
    for p in blue {
        let coeff = half_s2 * p.wavelength / sxx;
        integral += coeff * p.flux;
        var += (coeff * p.flux_err).powi(2);
    }
    (integral, var.sqrt())
}

/// Whether the epoch takes the linear UV path.
///
/// True iff the shortest observed band is U **and** its observed flux lies
/// below the fitted blackbody's prediction at that wavelength (line
/// blanketing suppressing the blue flux). In every other case — U absent,
/// U not the bluest band, or U at or above the model — the blackbody
/// integral is used.
pub fn linear_uv_applies(group: &EpochGroup, fit: &BlackbodyFit) -> bool {
    let shortest = group.shortest();
    shortest.filter_name == "U" && shortest.flux < fit.flux(shortest.wavelength)
}

/// UV correction for an epoch, applying the policy switch of
/// [`linear_uv_applies`].
pub fn uv_correction(group: &EpochGroup, fit: &BlackbodyFit) -> (f64, f64) {
    if linear_uv_applies(group, fit) {
        uv_correction_linear(&group.points)
    } else {
        uv_correction_blackbody(fit, group.shortest().wavelength)
    }
}
