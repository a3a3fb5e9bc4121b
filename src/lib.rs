//! Bolometric luminosity light curves of supernovae
//!
//! Converts multi-band photometric observations of a supernova into a
//! bolometric (total electromagnetic) luminosity light curve, following
//! the methods of Bersten & Hamuy 2009 (2009ApJ...701..200B). Three
//! estimators are provided:
//!
//! - **Direct integration** — trapezoidal integration of the observed
//!   fluxes, with blackbody-model corrections for the unobserved
//!   ultraviolet and infrared flux ([`supernova::Supernova::compute_direct_bolometric`])
//! - **Quasi-bolometric** — trapezoidal integration over the observed
//!   wavelength range only ([`supernova::Supernova::compute_quasi_bolometric`])
//! - **Color-based** — bolometric corrections calibrated on the B−V, V−I
//!   or B−I color ([`supernova::Supernova::compute_color_bolometric`])
//!
//! Photometry, filter reference data, and per-object parameters (explosion
//! date, extinction, distance) come from a read-only JSON catalog; see
//! [`store::Catalog`] for the schema.
//!
//! # Example
//!
//! ```no_run
//! use bolcurve::{LightCurveError, Supernova};
//!
//! # fn main() -> Result<(), LightCurveError> {
//! let mut sn = Supernova::new("sn1998a", "data/sn_catalog.json");
//!
//! for point in sn.compute_quasi_bolometric()? {
//!     println!(
//!         "{:10.2}  {:7.2} ± {:4.2}  {:.3e} ± {:.2e}",
//!         point.jd, point.phase, point.phase_err, point.luminosity, point.luminosity_err
//!     );
//! }
//! # Ok(())
//! # }
//! ```

pub mod blackbody;
pub mod bolcorr;
pub mod bolometric;
pub mod constants;
pub mod extinction;
pub mod flux;
pub mod integrate;
pub mod luminosity;
pub mod output;
pub mod photometry;
pub mod store;
pub mod supernova;
pub mod units;

pub use blackbody::{BlackbodyFit, FitError};
pub use photometry::{EpochGroup, FilterDescriptor, FluxPoint, Observation};
pub use store::{Catalog, ObjectParameters, StoreError};
pub use supernova::{LightCurveError, LightCurvePoint, LoadedData, Supernova};
