//! Planck blackbody flux model and two-parameter fitting
//!
//! Models the observed flux of a photosphere as
//!
//! F(λ; T, θ) = π θ² B_λ(λ, T)
//!
//! with B_λ the Planck function, T the effective temperature in Kelvin and
//! θ the angular radius in radians. Provides the model, its analytic
//! parameter derivatives, and a Levenberg–Marquardt weighted least-squares
//! fit of (T, θ) to one epoch's flux points.

use nalgebra::{Matrix2, Vector2};
use thiserror::Error;

use crate::constants::{C_LIGHT, CM_PER_ANGSTROM, H_PLANCK, K_BOLTZMANN, SIGMA_SB};
use crate::photometry::FluxPoint;
use crate::units::angstrom_to_cm;

/// Initial temperature guess in Kelvin
const INITIAL_TEMPERATURE: f64 = 5000.0;

/// Fallback initial angular radius in radians
const INITIAL_ANGULAR_RADIUS: f64 = 1.0e-10;

/// Maximum Levenberg–Marquardt iterations before giving up
const MAX_ITERATIONS: usize = 200;

/// Relative parameter change below which the fit is converged
const STEP_TOLERANCE: f64 = 1.0e-10;

/// Damping factor above which the fit is declared non-convergent
const MAX_DAMPING: f64 = 1.0e12;

/// Error type for blackbody fitting
#[derive(Debug, Error)]
pub enum FitError {
    /// Too few valid flux points to constrain two parameters
    #[error("blackbody fit needs at least 2 flux points, got {0}")]
    InsufficientData(usize),

    /// The iteration budget ran out without meeting the step tolerance
    #[error("blackbody fit did not converge after {0} iterations")]
    NonConvergence(usize),

    /// The normal equations became singular
    #[error("blackbody fit normal matrix is singular")]
    SingularMatrix,
}

/// Result of a converged blackbody fit.
#[derive(Debug, Clone, Copy)]
pub struct BlackbodyFit {
    /// Effective temperature in Kelvin
    pub temperature: f64,
    /// 1-σ temperature uncertainty
    pub temperature_err: f64,
    /// Angular radius in radians
    pub angular_radius: f64,
    /// 1-σ angular radius uncertainty
    pub angular_radius_err: f64,
    /// Weighted sum of squared residuals at the solution
    pub chi2: f64,
}

impl BlackbodyFit {
    /// Model flux at a wavelength in Ångströms, erg s⁻¹ cm⁻² Å⁻¹.
    pub fn flux(&self, wavelength: f64) -> f64 {
        planck_flux(wavelength, self.temperature, self.angular_radius)
    }

    /// Bolometric flux of the fitted photosphere, θ²σT⁴, erg s⁻¹ cm⁻².
    pub fn total_flux(&self) -> f64 {
        total_flux(self.temperature, self.angular_radius)
    }
}

/// Blackbody flux density at a wavelength in Ångströms.
///
/// Returns erg s⁻¹ cm⁻² Å⁻¹; zero for non-positive wavelength or
/// temperature.
pub fn planck_flux(wavelength: f64, temperature: f64, angular_radius: f64) -> f64 {
    if wavelength <= 0.0 || temperature <= 0.0 {
        return 0.0;
    }
    let lambda = angstrom_to_cm(wavelength);
    let x = H_PLANCK * C_LIGHT / (lambda * K_BOLTZMANN * temperature);
    // e⁻ˣ/(1−e⁻ˣ) form avoids overflow at short wavelengths
    let occupancy = (-x).exp() / (-(-x).exp_m1());
    let radiance = 2.0 * H_PLANCK * C_LIGHT * C_LIGHT / lambda.powi(5) * occupancy;
    std::f64::consts::PI * angular_radius * angular_radius * radiance * CM_PER_ANGSTROM
}

/// ∂F/∂T of [`planck_flux`] at fixed wavelength and angular radius.
pub fn planck_flux_dtemperature(wavelength: f64, temperature: f64, angular_radius: f64) -> f64 {
    if wavelength <= 0.0 || temperature <= 0.0 {
        return 0.0;
    }
    let lambda = angstrom_to_cm(wavelength);
    let x = H_PLANCK * C_LIGHT / (lambda * K_BOLTZMANN * temperature);
    let flux = planck_flux(wavelength, temperature, angular_radius);
    flux * (x / temperature) / (-(-x).exp_m1())
}

/// ∂F/∂θ of [`planck_flux`] at fixed wavelength and temperature.
pub fn planck_flux_dradius(wavelength: f64, temperature: f64, angular_radius: f64) -> f64 {
    if angular_radius == 0.0 {
        return 0.0;
    }
    2.0 * planck_flux(wavelength, temperature, angular_radius) / angular_radius
}

/// Wavelength-integrated flux of the model, θ²σT⁴, erg s⁻¹ cm⁻².
pub fn total_flux(temperature: f64, angular_radius: f64) -> f64 {
    angular_radius * angular_radius * SIGMA_SB * temperature.powi(4)
}

/// Fit (temperature, angular radius) to one epoch's flux points.
///
/// Levenberg–Marquardt on the weighted residuals (F(λᵢ) − fᵢ)/σᵢ, with
/// analytic derivatives and Marquardt diagonal scaling of the normal
/// equations. Parameter uncertainties come from the inverse normal matrix
/// at the solution, scaled by the reduced χ² when there are spare degrees
/// of freedom.
///
/// `points` must be sorted ascending in wavelength (the [`crate::photometry::EpochGroup`]
/// invariant). A point with a non-positive flux uncertainty gets unit
/// weight.
///
/// # Errors
/// [`FitError::InsufficientData`] for fewer than 2 points;
/// [`FitError::NonConvergence`] or [`FitError::SingularMatrix`] when the
/// optimizer fails. Callers are expected to skip the epoch — a failed fit
/// never yields parameters.
pub fn fit_blackbody(points: &[FluxPoint]) -> Result<BlackbodyFit, FitError> {
    if points.len() < 2 {
        return Err(FitError::InsufficientData(points.len()));
    }

    let weights: Vec<f64> = points
        .iter()
        .map(|p| if p.flux_err > 0.0 { 1.0 / p.flux_err } else { 1.0 })
        .collect();

    let mut temperature = INITIAL_TEMPERATURE;
    let mut radius = initial_radius(points, temperature);
    let mut chi2 = chi_squared(points, &weights, temperature, radius);
    let mut damping = 1.0e-3;

    for iteration in 0..MAX_ITERATIONS {
        let (normal, gradient) = normal_equations(points, &weights, temperature, radius);

        // Marquardt scaling: normalize to unit diagonal so the two columns
        // (∼K and ∼radian scales, twenty decades apart) stay solvable
        let d0 = normal[(0, 0)].sqrt();
        let d1 = normal[(1, 1)].sqrt();
        if !(d0.is_finite() && d1.is_finite()) || d0 == 0.0 || d1 == 0.0 {
            return Err(FitError::SingularMatrix);
        }

        let scaled = Matrix2::new(
            normal[(0, 0)] / (d0 * d0) + damping,
            normal[(0, 1)] / (d0 * d1),
            normal[(1, 0)] / (d1 * d0),
            normal[(1, 1)] / (d1 * d1) + damping,
        );
        let scaled_gradient = Vector2::new(gradient[0] / d0, gradient[1] / d1);

        let step = match scaled.lu().solve(&(-scaled_gradient)) {
            Some(s) => Vector2::new(s[0] / d0, s[1] / d1),
            None => return Err(FitError::SingularMatrix),
        };

        // A step already below tolerance means the optimum is resolved to
        // rounding noise
        if (step[0] / temperature).abs() < STEP_TOLERANCE
            && (step[1] / radius).abs() < STEP_TOLERANCE
        {
            return finish_fit(points, &weights, temperature, radius, chi2);
        }

        let new_temperature = temperature + step[0];
        let new_radius = radius + step[1];

        // Reject steps that leave the physical domain
        let acceptable = new_temperature > 0.0 && new_radius > 0.0;
        let new_chi2 = if acceptable {
            chi_squared(points, &weights, new_temperature, new_radius)
        } else {
            f64::INFINITY
        };

        if new_chi2 <= chi2 {
            let converged = (step[0] / new_temperature).abs() < STEP_TOLERANCE
                && (step[1] / new_radius).abs() < STEP_TOLERANCE;
            temperature = new_temperature;
            radius = new_radius;
            chi2 = new_chi2;
            damping = (damping * 0.1).max(1.0e-14);
            if converged {
                return finish_fit(points, &weights, temperature, radius, chi2);
            }
        } else {
            damping *= 10.0;
            if damping > MAX_DAMPING {
                return Err(FitError::NonConvergence(iteration + 1));
            }
        }
    }

    Err(FitError::NonConvergence(MAX_ITERATIONS))
}

/// Seed the angular radius by matching the brightest observed point.
fn initial_radius(points: &[FluxPoint], temperature: f64) -> f64 {
    let brightest = points
        .iter()
        .fold(&points[0], |best, p| if p.flux > best.flux { p } else { best });
    let unit_flux = planck_flux(brightest.wavelength, temperature, 1.0);
    let seeded = (brightest.flux / unit_flux).sqrt();
    if seeded.is_finite() && seeded > 0.0 {
        seeded
    } else {
        INITIAL_ANGULAR_RADIUS
    }
}

fn chi_squared(points: &[FluxPoint], weights: &[f64], temperature: f64, radius: f64) -> f64 {
    points
        .iter()
        .zip(weights)
        .map(|(p, w)| {
            let r = (planck_flux(p.wavelength, temperature, radius) - p.flux) * w;
            r * r
        })
        .sum()
}

/// Build JᵀJ and Jᵀr for the weighted residual vector.
fn normal_equations(
    points: &[FluxPoint],
    weights: &[f64],
    temperature: f64,
    radius: f64,
) -> (Matrix2<f64>, Vector2<f64>) {
    let mut jtj = Matrix2::zeros();
    let mut jtr = Vector2::zeros();

    for (p, w) in points.iter().zip(weights) {
        let residual = (planck_flux(p.wavelength, temperature, radius) - p.flux) * w;
        let jt = planck_flux_dtemperature(p.wavelength, temperature, radius) * w;
        let jr = planck_flux_dradius(p.wavelength, temperature, radius) * w;

        jtj[(0, 0)] += jt * jt;
        jtj[(0, 1)] += jt * jr;
        jtj[(1, 0)] += jt * jr;
        jtj[(1, 1)] += jr * jr;
        jtr[0] += jt * residual;
        jtr[1] += jr * residual;
    }

    (jtj, jtr)
}

/// Parameter uncertainties from the inverse normal matrix at the solution.
fn finish_fit(
    points: &[FluxPoint],
    weights: &[f64],
    temperature: f64,
    radius: f64,
    chi2: f64,
) -> Result<BlackbodyFit, FitError> {
    let (normal, _) = normal_equations(points, weights, temperature, radius);

    let d0 = normal[(0, 0)].sqrt();
    let d1 = normal[(1, 1)].sqrt();
    if !(d0.is_finite() && d1.is_finite()) || d0 == 0.0 || d1 == 0.0 {
        return Err(FitError::SingularMatrix);
    }
    let scaled = Matrix2::new(
        1.0,
        normal[(0, 1)] / (d0 * d1),
        normal[(1, 0)] / (d1 * d0),
        1.0,
    );
    let inverse = scaled.try_inverse().ok_or(FitError::SingularMatrix)?;

    // Reduced-χ² scaling when there are spare degrees of freedom
    let dof = points.len().saturating_sub(2);
    let scale = if dof > 0 { chi2 / dof as f64 } else { 1.0 };

    let var_t = inverse[(0, 0)] / (d0 * d0) * scale;
    let var_r = inverse[(1, 1)] / (d1 * d1) * scale;
    if var_t < 0.0 || var_r < 0.0 {
        return Err(FitError::SingularMatrix);
    }

    Ok(BlackbodyFit {
        temperature,
        temperature_err: var_t.sqrt(),
        angular_radius: radius,
        angular_radius_err: var_r.sqrt(),
        chi2,
    })
}
