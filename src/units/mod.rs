//! Type-safe length conversions built on the `uom` crate
//!
//! The catalog stores distances in megaparsecs and wavelengths in Ångströms;
//! the radiative transfer math runs in CGS. The conversions live here so the
//! numerical modules never carry their own scale factors.
//!
//! Re-exports the commonly used `uom::si::f64` length type and units.

// Re-export uom SI quantity types for convenience
pub use uom::si::f64::Length;

pub use uom::si::length::angstrom;
pub use uom::si::length::centimeter;
pub use uom::si::length::parsec;

use crate::constants::{CM_PER_ANGSTROM, CM_PER_MPC};

/// Convert a distance in megaparsecs to centimeters.
pub fn mpc_to_cm(mpc: f64) -> f64 {
    mpc * CM_PER_MPC
}

/// Convert centimeters to megaparsecs.
pub fn cm_to_mpc(cm: f64) -> f64 {
    cm / CM_PER_MPC
}

/// Convert a wavelength in Ångströms to centimeters.
pub fn angstrom_to_cm(wl: f64) -> f64 {
    wl * CM_PER_ANGSTROM
}

/// Convert a wavelength in Ångströms to inverse microns.
///
/// The reddening law is parameterized in x = 1/λ with λ in microns.
pub fn angstrom_to_inverse_micron(wl: f64) -> f64 {
    1.0e4 / wl
}
