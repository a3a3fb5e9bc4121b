//! Quadrature routines for flux integration
//!
//! Provides:
//! - [`trapezoidal`] — trapezoidal rule over tabulated points with
//!   uncertainty propagation
//! - [`adaptive_simpson`] — adaptive Simpson quadrature for smooth models
//! - [`integrate_to_infinity`] — improper tail integral via 1/λ substitution

/// Default relative tolerance for adaptive quadrature
pub const DEFAULT_TOLERANCE: f64 = 1.0e-10;

/// Maximum bisection depth for adaptive quadrature
const MAX_DEPTH: u32 = 40;

/// Trapezoidal-rule integral of tabulated (x, y) points with uncertainties.
///
/// The integral is a linear functional of the ordinates, so the propagated
/// uncertainty weights each point by its total trapezoid coefficient —
/// endpoints shared between adjacent segments are counted once:
///
/// c₀ = (x₁−x₀)/2,  cᵢ = (xᵢ₊₁−xᵢ₋₁)/2,  cₙ₋₁ = (xₙ₋₁−xₙ₋₂)/2
///
/// # Arguments
/// * `x` - Abscissae, sorted ascending
/// * `y` - Ordinates, one per abscissa
/// * `y_err` - 1-σ ordinate uncertainties
///
/// # Returns
/// `(integral, integral_err)`. Fewer than two points integrate to `(0, 0)`.
pub fn trapezoidal(x: &[f64], y: &[f64], y_err: &[f64]) -> (f64, f64) {
    assert_eq!(x.len(), y.len(), "abscissae and ordinates must match");
    assert_eq!(x.len(), y_err.len(), "ordinates and uncertainties must match");

    let n = x.len();
    if n < 2 {
        return (0.0, 0.0);
    }

    let mut integral = 0.0;
    for i in 0..n - 1 {
        integral += (x[i + 1] - x[i]) * (y[i] + y[i + 1]) / 2.0;
    }

    let mut var = 0.0;
    for i in 0..n {
        let coeff = if i == 0 {
            (x[1] - x[0]) / 2.0
        } else if i == n - 1 {
            (x[n - 1] - x[n - 2]) / 2.0
        } else {
            (x[i + 1] - x[i - 1]) / 2.0
        };
        var += (coeff * y_err[i]).powi(2);
    }

    (integral, var.sqrt())
}

/// Adaptive Simpson quadrature of `f` over `[a, b]`.
///
/// Bisects until the local Simpson estimate is stable to `tol`, with
/// Richardson extrapolation of the final estimate. Intended for smooth
/// integrands such as the Planck function.
pub fn adaptive_simpson<F>(f: &F, a: f64, b: f64, tol: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return 0.0;
    }
    let m = (a + b) / 2.0;
    let fa = f(a);
    let fm = f(m);
    let fb = f(b);
    let whole = simpson_estimate(a, b, fa, fm, fb);
    simpson_recurse(f, a, b, fa, fm, fb, whole, tol, MAX_DEPTH)
}

/// Integrate `f` from `a` to infinity via the substitution u = 1/λ.
///
/// ∫ₐ^∞ f(λ) dλ = ∫₀^{1/a} f(1/u) / u² du
///
/// Requires `a > 0` and an integrand decaying faster than λ⁻² (the
/// Rayleigh–Jeans tail of the Planck function falls off as λ⁻⁴). The
/// transformed integrand is taken as zero at u = 0.
pub fn integrate_to_infinity<F>(f: &F, a: f64, tol: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    assert!(a > 0.0, "tail integral requires a positive lower bound");
    let transformed = |u: f64| {
        if u <= 0.0 {
            0.0
        } else {
            f(1.0 / u) / (u * u)
        }
    };
    adaptive_simpson(&transformed, 0.0, 1.0 / a, tol)
}

fn simpson_estimate(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

#[allow(clippy::too_many_arguments)]
fn simpson_recurse<F>(
    f: &F,
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    tol: f64,
    depth: u32,
) -> f64
where
    F: Fn(f64) -> f64,
{
    let m = (a + b) / 2.0;
    let lm = (a + m) / 2.0;
    let rm = (m + b) / 2.0;
    let flm = f(lm);
    let frm = f(rm);

    let left = simpson_estimate(a, m, fa, flm, fm);
    let right = simpson_estimate(m, b, fm, frm, fb);
    let delta = left + right - whole;

    if depth == 0 || delta.abs() <= 15.0 * tol {
        return left + right + delta / 15.0;
    }

    simpson_recurse(f, a, m, fa, flm, fm, left, tol / 2.0, depth - 1)
        + simpson_recurse(f, m, b, fm, frm, fb, right, tol / 2.0, depth - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trapezoidal_straight_line() {
        // ∫ 2x dx over [0, 4] = 16, exact for the trapezoid rule
        let x = [0.0, 1.0, 3.0, 4.0];
        let y = [0.0, 2.0, 6.0, 8.0];
        let e = [0.0; 4];
        let (integral, err) = trapezoidal(&x, &y, &e);
        assert_relative_eq!(integral, 16.0, epsilon = 1e-12);
        assert_relative_eq!(err, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trapezoidal_endpoint_coefficients() {
        // Uniform spacing h=1, unit errors: coefficients (1/2, 1, 1, 1/2)
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0; 4];
        let e = [1.0; 4];
        let (_, err) = trapezoidal(&x, &y, &e);
        let expected = (0.25_f64 + 1.0 + 1.0 + 0.25).sqrt();
        assert_relative_eq!(err, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_trapezoidal_degenerate_inputs() {
        assert_eq!(trapezoidal(&[], &[], &[]), (0.0, 0.0));
        assert_eq!(trapezoidal(&[1.0], &[2.0], &[0.1]), (0.0, 0.0));
    }

    #[test]
    fn test_simpson_polynomial_exact() {
        // Simpson is exact for cubics
        let f = |x: f64| x * x * x - 2.0 * x + 1.0;
        let integral = adaptive_simpson(&f, 0.0, 2.0, 1e-12);
        assert_relative_eq!(integral, 4.0 - 4.0 + 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_simpson_transcendental() {
        let integral = adaptive_simpson(&f64::sin, 0.0, std::f64::consts::PI, 1e-12);
        assert_relative_eq!(integral, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_simpson_empty_interval() {
        assert_eq!(adaptive_simpson(&f64::sin, 1.0, 1.0, 1e-12), 0.0);
    }

    #[test]
    fn test_tail_integral_power_law() {
        // ∫₁^∞ λ⁻⁴ dλ = 1/3
        let f = |x: f64| x.powi(-4);
        let integral = integrate_to_infinity(&f, 1.0, 1e-12);
        assert_relative_eq!(integral, 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tail_integral_exponential() {
        // ∫₂^∞ e^(−λ) dλ = e⁻²
        let f = |x: f64| (-x).exp();
        let integral = integrate_to_infinity(&f, 2.0, 1e-13);
        assert_relative_eq!(integral, (-2.0_f64).exp(), max_relative = 1e-8);
    }
}
