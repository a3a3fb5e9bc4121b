//! Bolometric light-curve computation for one supernova
//!
//! A [`Supernova`] names an object in a photometry catalog and exposes the
//! three light-curve estimators:
//!
//! - [`Supernova::compute_direct_bolometric`] — trapezoidal integration of
//!   the observed fluxes plus blackbody UV/IR corrections (Bersten & Hamuy
//!   2009)
//! - [`Supernova::compute_quasi_bolometric`] — trapezoidal integration over
//!   the observed wavelengths only
//! - [`Supernova::compute_color_bolometric`] — bolometric corrections
//!   calibrated on a two-filter color
//!
//! Each method opens the catalog, computes, and releases it before
//! returning; merged photometry is memoized on the instance after the
//! first load. The numerical pipelines themselves are pure functions over
//! a [`LoadedData`] snapshot, so they are testable without any catalog on
//! disk.
//!
//! Recoverable problems (too few points at an epoch, a failed blackbody
//! fit, a color outside its calibration) skip that epoch and continue;
//! catalog-level problems and unsupported colors abort the call.

use std::path::PathBuf;

use log::{debug, warn};
use thiserror::Error;

use crate::blackbody::fit_blackbody;
use crate::bolcorr::{bolometric_correction, bolometric_flux, calibration_for};
use crate::bolometric::{ir_correction, observed_flux, uv_correction};
use crate::extinction::{deredden_fluxes, deredden_ubvri_magnitudes};
use crate::luminosity::{luminosity, phase};
use crate::photometry::{
    combine_photometry, convert_to_flux_points, group_by_epoch, group_observations_by_epoch,
    select_filter_pair, select_min_observations, Observation,
};
use crate::store::{Catalog, ObjectParameters, StoreError};

/// Default minimum number of flux points for an epoch to be usable
pub const DEFAULT_MIN_OBSERVATIONS: usize = 4;

/// Epochs whose bluest observation is at or beyond this wavelength (Å) are
/// IR-only and excluded from the quasi-bolometric curve.
const QUASI_BLUE_LIMIT: f64 = 10_000.0;

/// Error type for light-curve computation
#[derive(Debug, Error)]
pub enum LightCurveError {
    /// The catalog could not be read or the object is missing from it
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The color method was asked for a filter pair with no calibration
    #[error("unsupported color {filter1}-{filter2}: calibrated colors are B-V, V-I and B-I")]
    UnsupportedColor { filter1: String, filter2: String },
}

/// One point of a bolometric light curve.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LightCurvePoint {
    /// Julian date of the epoch
    pub jd: f64,
    /// Days since explosion
    pub phase: f64,
    /// 1-σ phase uncertainty (the explosion-date uncertainty)
    pub phase_err: f64,
    /// Luminosity in erg s⁻¹
    pub luminosity: f64,
    /// 1-σ luminosity uncertainty
    pub luminosity_err: f64,
}

/// Everything the pure pipelines need for one object: merged photometry
/// plus the parameter record.
#[derive(Debug, Clone)]
pub struct LoadedData {
    /// Time-ordered photometry, merged across the object's source tables
    pub observations: Vec<Observation>,
    /// Explosion date, extinction, and distance
    pub parameters: ObjectParameters,
}

/// A named supernova backed by a photometry catalog file.
#[derive(Debug)]
pub struct Supernova {
    name: String,
    source: PathBuf,
    min_num_obs: usize,
    /// Merged photometry, kept after the first load
    photometry: Option<Vec<Observation>>,
}

impl Supernova {
    /// Create a handle for the named object in the given catalog file.
    ///
    /// Nothing is read until a compute method is called.
    pub fn new(name: impl Into<String>, catalog_path: impl Into<PathBuf>) -> Self {
        Supernova {
            name: name.into(),
            source: catalog_path.into(),
            min_num_obs: DEFAULT_MIN_OBSERVATIONS,
            photometry: None,
        }
    }

    /// Override the minimum observation count per epoch (default 4).
    pub fn with_min_observations(mut self, min_num_obs: usize) -> Self {
        self.min_num_obs = min_num_obs;
        self
    }

    /// The object's name in the catalog.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct-integration bolometric light curve: observed trapezoidal flux
    /// plus blackbody UV and IR corrections per epoch.
    pub fn compute_direct_bolometric(&mut self) -> Result<Vec<LightCurvePoint>, LightCurveError> {
        let catalog = Catalog::open(&self.source)?;
        let data = self.load(&catalog)?;
        Ok(direct_bolometric_lightcurve(&data, self.min_num_obs))
    }

    /// Quasi-bolometric light curve: observed trapezoidal flux only, no
    /// extrapolation beyond the observed wavelength range.
    pub fn compute_quasi_bolometric(&mut self) -> Result<Vec<LightCurvePoint>, LightCurveError> {
        let catalog = Catalog::open(&self.source)?;
        let data = self.load(&catalog)?;
        Ok(quasi_bolometric_lightcurve(&data, self.min_num_obs))
    }

    /// Color-based bolometric light curve for the `filter1` − `filter2`
    /// color. Only B−V, V−I and B−I are calibrated; any other pair fails
    /// before any epoch is processed.
    pub fn compute_color_bolometric(
        &mut self,
        filter1: &str,
        filter2: &str,
    ) -> Result<Vec<LightCurvePoint>, LightCurveError> {
        let catalog = Catalog::open(&self.source)?;
        let data = self.load(&catalog)?;
        color_bolometric_lightcurve(&data, filter1, filter2)
    }

    /// Snapshot the catalog's view of this object, reusing photometry
    /// already merged by an earlier call.
    fn load(&mut self, catalog: &Catalog) -> Result<LoadedData, StoreError> {
        let parameters = catalog.parameters(&self.name)?.clone();
        let observations = match &self.photometry {
            Some(observations) => observations.clone(),
            None => {
                let tables = catalog.photometry_tables(&self.name)?;
                let merged = combine_photometry(&tables);
                debug!(
                    "{}: merged {} observations from {} tables",
                    self.name,
                    merged.len(),
                    tables.len()
                );
                self.photometry = Some(merged.clone());
                merged
            }
        };
        Ok(LoadedData {
            observations,
            parameters,
        })
    }
}

/// Direct-integration pipeline over a loaded snapshot.
pub fn direct_bolometric_lightcurve(data: &LoadedData, min_num_obs: usize) -> Vec<LightCurvePoint> {
    let params = &data.parameters;
    let mut points = convert_to_flux_points(&data.observations);
    deredden_fluxes(&mut points, params.av_total());
    let groups = select_min_observations(group_by_epoch(points), min_num_obs);
    debug!("direct: {} epochs pass selection", groups.len());

    let (distance_cm, distance_cm_err) = params.distance_cm();
    let mut lightcurve = Vec::with_capacity(groups.len());

    for group in &groups {
        let fit = match fit_blackbody(&group.points) {
            Ok(fit) => fit,
            Err(err) => {
                warn!("skipping epoch JD {}: {}", group.jd, err);
                continue;
            }
        };

        let (fqbol, fqbol_err) = observed_flux(group);
        let (ir, ir_err) = ir_correction(&fit, group.longest().wavelength);
        let (uv, uv_err) = uv_correction(group, &fit);

        let fbol = fqbol + ir + uv;
        let fbol_err = (fqbol_err * fqbol_err + ir_err * ir_err + uv_err * uv_err).sqrt();

        let (lum, lum_err) = luminosity(fbol, fbol_err, distance_cm, distance_cm_err);
        let (ph, ph_err) = phase(group.jd, params.explosion_jd, params.explosion_jd_err);
        lightcurve.push(LightCurvePoint {
            jd: group.jd,
            phase: ph,
            phase_err: ph_err,
            luminosity: lum,
            luminosity_err: lum_err,
        });
    }
    lightcurve
}

/// Quasi-bolometric pipeline over a loaded snapshot.
///
/// Epochs with no observation blueward of 10000 Å are excluded: an IR-only
/// night integrates a sliver of the spectrum and would read as a spurious
/// dip in the curve.
pub fn quasi_bolometric_lightcurve(data: &LoadedData, min_num_obs: usize) -> Vec<LightCurvePoint> {
    let params = &data.parameters;
    let mut points = convert_to_flux_points(&data.observations);
    deredden_fluxes(&mut points, params.av_total());
    let groups = select_min_observations(group_by_epoch(points), min_num_obs);
    debug!("quasi: {} epochs pass selection", groups.len());

    let (distance_cm, distance_cm_err) = params.distance_cm();
    let mut lightcurve = Vec::with_capacity(groups.len());

    for group in &groups {
        if group.shortest().wavelength >= QUASI_BLUE_LIMIT {
            warn!("skipping IR-only epoch JD {}", group.jd);
            continue;
        }

        let (fqbol, fqbol_err) = observed_flux(group);
        let (lum, lum_err) = luminosity(fqbol, fqbol_err, distance_cm, distance_cm_err);
        let (ph, ph_err) = phase(group.jd, params.explosion_jd, params.explosion_jd_err);
        lightcurve.push(LightCurvePoint {
            jd: group.jd,
            phase: ph,
            phase_err: ph_err,
            luminosity: lum,
            luminosity_err: lum_err,
        });
    }
    lightcurve
}

/// Color-based pipeline over a loaded snapshot.
pub fn color_bolometric_lightcurve(
    data: &LoadedData,
    filter1: &str,
    filter2: &str,
) -> Result<Vec<LightCurvePoint>, LightCurveError> {
    let calibration =
        calibration_for(filter1, filter2).ok_or_else(|| LightCurveError::UnsupportedColor {
            filter1: filter1.to_string(),
            filter2: filter2.to_string(),
        })?;

    let params = &data.parameters;
    let mut observations = data.observations.clone();
    deredden_ubvri_magnitudes(&mut observations, params.av_total());
    let epochs = select_filter_pair(group_observations_by_epoch(&observations), filter1, filter2);
    debug!(
        "color {}: {} epochs have both filters",
        calibration.color,
        epochs.len()
    );

    let (distance_cm, distance_cm_err) = params.distance_cm();
    let mut lightcurve = Vec::with_capacity(epochs.len());

    for epoch in &epochs {
        // Pair availability was already selected for
        let Some((color, color_err)) = epoch.color(filter1, filter2) else {
            continue;
        };
        let Some((v_mag, v_mag_err)) = epoch.magnitude("V") else {
            warn!("skipping epoch JD {}: no V magnitude", epoch.jd);
            continue;
        };
        let Some((bc, bc_err)) = bolometric_correction(calibration, color, color_err) else {
            warn!(
                "skipping epoch JD {}: {} = {:.3} outside calibration range",
                epoch.jd, calibration.color, color
            );
            continue;
        };

        let (fbol, fbol_err) = bolometric_flux(bc, bc_err, v_mag, v_mag_err);
        let (lum, lum_err) = luminosity(fbol, fbol_err, distance_cm, distance_cm_err);
        let (ph, ph_err) = phase(epoch.jd, params.explosion_jd, params.explosion_jd_err);
        lightcurve.push(LightCurvePoint {
            jd: epoch.jd,
            phase: ph,
            phase_err: ph_err,
            luminosity: lum,
            luminosity_err: lum_err,
        });
    }
    Ok(lightcurve)
}
