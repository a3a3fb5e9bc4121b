//! Photometric observations, flux points, and epoch bookkeeping
//!
//! An [`Observation`] is one magnitude measurement in one filter at one
//! Julian date. Observations from all of an object's source tables are
//! merged into a single time-ordered collection, converted to
//! [`FluxPoint`]s, and grouped into [`EpochGroup`]s — the unit over which
//! blackbody fitting and flux integration operate.
//!
//! Epoch identity is exact f64 equality on the Julian date: epochs
//! originate from a fixed catalog, so no tolerance matching is performed.
//! Grouping is done once per call, replacing repeated equality scans over
//! the full observation collection.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_MODEL_WAVELENGTH, MIN_MODEL_WAVELENGTH};
use crate::flux::mag_to_flux;

/// Static reference data for one photometric filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    /// Short filter designation ("U", "B", "V", ...)
    pub name: String,
    /// Effective wavelength in Ångströms
    pub eff_wl: f64,
    /// Flux at magnitude zero, erg s⁻¹ cm⁻² Å⁻¹
    pub flux_zeropoint: f64,
    /// Numeric identifier joining photometry rows to this filter
    pub filter_id: u32,
}

/// One magnitude measurement, joined against its filter descriptor.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Julian date of the observation
    pub jd: f64,
    /// Filter the measurement was taken in
    pub filter: FilterDescriptor,
    /// Apparent magnitude
    pub magnitude: f64,
    /// 1-σ magnitude uncertainty
    pub uncertainty: f64,
}

/// A monochromatic flux density derived from an [`Observation`].
#[derive(Debug, Clone)]
pub struct FluxPoint {
    /// Julian date of the observation
    pub jd: f64,
    /// Filter designation, kept for the UV-policy decision
    pub filter_name: String,
    /// Effective wavelength in Ångströms
    pub wavelength: f64,
    /// Flux density in erg s⁻¹ cm⁻² Å⁻¹
    pub flux: f64,
    /// 1-σ flux uncertainty
    pub flux_err: f64,
}

/// All flux points sharing one epoch, sorted ascending by wavelength.
///
/// The wavelength ordering is an invariant: shortest/longest-band access
/// and the trapezoidal integral both rely on it.
#[derive(Debug, Clone)]
pub struct EpochGroup {
    /// Julian date shared by every point in the group
    pub jd: f64,
    /// Flux points, ascending in wavelength
    pub points: Vec<FluxPoint>,
}

impl EpochGroup {
    /// The shortest-wavelength point in the group.
    pub fn shortest(&self) -> &FluxPoint {
        &self.points[0]
    }

    /// The longest-wavelength point in the group.
    pub fn longest(&self) -> &FluxPoint {
        &self.points[self.points.len() - 1]
    }
}

/// All magnitude observations sharing one epoch (color-method view).
#[derive(Debug, Clone)]
pub struct EpochPhotometry {
    /// Julian date shared by every observation
    pub jd: f64,
    /// Observations at this epoch, in merged order
    pub observations: Vec<Observation>,
}

impl EpochPhotometry {
    /// Magnitude and uncertainty in the named filter, if observed.
    pub fn magnitude(&self, filter_name: &str) -> Option<(f64, f64)> {
        self.observations
            .iter()
            .find(|obs| obs.filter.name == filter_name)
            .map(|obs| (obs.magnitude, obs.uncertainty))
    }

    /// The `f1` − `f2` color and its quadrature-combined uncertainty.
    ///
    /// Returns `None` unless both filters were observed at this epoch.
    pub fn color(&self, f1: &str, f2: &str) -> Option<(f64, f64)> {
        let (m1, e1) = self.magnitude(f1)?;
        let (m2, e2) = self.magnitude(f2)?;
        Some((m1 - m2, (e1 * e1 + e2 * e2).sqrt()))
    }
}

/// Merge photometry from multiple source tables into one time-ordered view.
///
/// Rows are ordered by Julian date, then by effective wavelength within an
/// epoch.
pub fn combine_photometry(tables: &[Vec<Observation>]) -> Vec<Observation> {
    let mut merged: Vec<Observation> = tables.iter().flatten().cloned().collect();
    merged.sort_by(|a, b| {
        a.jd.total_cmp(&b.jd)
            .then(a.filter.eff_wl.total_cmp(&b.filter.eff_wl))
    });
    merged
}

/// Convert observations to flux points, keeping only wavelengths inside the
/// model's valid range [909.09, 33333.33] Å.
pub fn convert_to_flux_points(observations: &[Observation]) -> Vec<FluxPoint> {
    observations
        .iter()
        .filter(|obs| {
            (MIN_MODEL_WAVELENGTH..=MAX_MODEL_WAVELENGTH).contains(&obs.filter.eff_wl)
        })
        .map(|obs| {
            let (flux, flux_err) = mag_to_flux(obs.magnitude, obs.uncertainty, obs.filter.flux_zeropoint);
            FluxPoint {
                jd: obs.jd,
                filter_name: obs.filter.name.clone(),
                wavelength: obs.filter.eff_wl,
                flux,
                flux_err,
            }
        })
        .collect()
}

/// Group flux points by epoch, ascending in Julian date.
///
/// Points within each group are sorted ascending by wavelength,
/// establishing the [`EpochGroup`] ordering invariant.
pub fn group_by_epoch(mut points: Vec<FluxPoint>) -> Vec<EpochGroup> {
    points.sort_by(|a, b| a.jd.total_cmp(&b.jd).then(a.wavelength.total_cmp(&b.wavelength)));

    let mut groups: Vec<EpochGroup> = Vec::new();
    for point in points {
        match groups.last_mut() {
            Some(group) if group.jd == point.jd => group.points.push(point),
            _ => groups.push(EpochGroup {
                jd: point.jd,
                points: vec![point],
            }),
        }
    }
    groups
}

/// Group magnitude observations by epoch, ascending in Julian date.
pub fn group_observations_by_epoch(observations: &[Observation]) -> Vec<EpochPhotometry> {
    let mut sorted: Vec<Observation> = observations.to_vec();
    sorted.sort_by(|a, b| a.jd.total_cmp(&b.jd));

    let mut epochs: Vec<EpochPhotometry> = Vec::new();
    for obs in sorted {
        match epochs.last_mut() {
            Some(epoch) if epoch.jd == obs.jd => epoch.observations.push(obs),
            _ => epochs.push(EpochPhotometry {
                jd: obs.jd,
                observations: vec![obs],
            }),
        }
    }
    epochs
}

/// Minimum-observation-count selection: keep epochs with at least
/// `min_obs` valid flux points.
pub fn select_min_observations(groups: Vec<EpochGroup>, min_obs: usize) -> Vec<EpochGroup> {
    groups
        .into_iter()
        .filter(|group| group.points.len() >= min_obs)
        .collect()
}

/// Pair-availability selection: keep epochs where both named filters were
/// observed. Used exclusively by the color-based method.
pub fn select_filter_pair(
    epochs: Vec<EpochPhotometry>,
    f1: &str,
    f2: &str,
) -> Vec<EpochPhotometry> {
    epochs
        .into_iter()
        .filter(|epoch| epoch.magnitude(f1).is_some() && epoch.magnitude(f2).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn filter(name: &str, eff_wl: f64, id: u32) -> FilterDescriptor {
        FilterDescriptor {
            name: name.to_string(),
            eff_wl,
            flux_zeropoint: 3.631e-9,
            filter_id: id,
        }
    }

    fn obs(jd: f64, name: &str, eff_wl: f64, mag: f64) -> Observation {
        Observation {
            jd,
            filter: filter(name, eff_wl, 0),
            magnitude: mag,
            uncertainty: 0.05,
        }
    }

    #[test]
    fn test_combine_orders_by_time_then_wavelength() {
        let table_a = vec![obs(2450002.0, "V", 5450.0, 15.0), obs(2450001.0, "B", 4380.0, 15.5)];
        let table_b = vec![obs(2450001.0, "U", 3660.0, 16.0)];
        let merged = combine_photometry(&[table_a, table_b]);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].filter.name, "U");
        assert_eq!(merged[1].filter.name, "B");
        assert_relative_eq!(merged[2].jd, 2450002.0);
    }

    #[test]
    fn test_flux_conversion_applies_wavelength_window() {
        let rows = vec![
            obs(2450001.0, "FUV", 800.0, 15.0),   // below 909.09 Å
            obs(2450001.0, "V", 5450.0, 15.0),    // inside
            obs(2450001.0, "M", 45000.0, 15.0),   // above 33333.33 Å
        ];
        let points = convert_to_flux_points(&rows);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].filter_name, "V");
    }

    #[test]
    fn test_group_by_epoch_sorts_wavelengths() {
        let rows = vec![
            obs(2450001.0, "I", 7980.0, 14.0),
            obs(2450001.0, "U", 3660.0, 16.0),
            obs(2450001.0, "V", 5450.0, 15.0),
        ];
        let groups = group_by_epoch(convert_to_flux_points(&rows));

        assert_eq!(groups.len(), 1);
        let wavelengths: Vec<f64> = groups[0].points.iter().map(|p| p.wavelength).collect();
        assert_eq!(wavelengths, vec![3660.0, 5450.0, 7980.0]);
        assert_eq!(groups[0].shortest().filter_name, "U");
        assert_eq!(groups[0].longest().filter_name, "I");
    }

    #[test]
    fn test_groups_ascend_in_time() {
        let rows = vec![
            obs(2450005.0, "V", 5450.0, 15.0),
            obs(2450001.0, "V", 5450.0, 15.2),
            obs(2450003.0, "V", 5450.0, 15.1),
        ];
        let groups = group_by_epoch(convert_to_flux_points(&rows));
        let jds: Vec<f64> = groups.iter().map(|g| g.jd).collect();
        assert_eq!(jds, vec![2450001.0, 2450003.0, 2450005.0]);
    }

    #[test]
    fn test_min_observation_selection() {
        // Epochs with 3, 4, and 5 filters; threshold 4 keeps the last two
        let mut rows = Vec::new();
        let bands = [
            ("U", 3660.0),
            ("B", 4380.0),
            ("V", 5450.0),
            ("R", 6410.0),
            ("I", 7980.0),
        ];
        for (count, jd) in [(3, 2450001.0), (4, 2450002.0), (5, 2450003.0)] {
            for (name, wl) in bands.iter().take(count) {
                rows.push(obs(jd, name, *wl, 15.0));
            }
        }
        let groups = group_by_epoch(convert_to_flux_points(&rows));
        let selected = select_min_observations(groups, 4);

        let jds: Vec<f64> = selected.iter().map(|g| g.jd).collect();
        assert_eq!(jds, vec![2450002.0, 2450003.0]);
    }

    #[test]
    fn test_filter_pair_selection() {
        let rows = vec![
            obs(2450001.0, "B", 4380.0, 15.5),
            obs(2450001.0, "V", 5450.0, 15.0),
            obs(2450002.0, "B", 4380.0, 15.6),
            obs(2450003.0, "V", 5450.0, 15.1),
        ];
        let epochs = group_observations_by_epoch(&rows);
        let selected = select_filter_pair(epochs, "B", "V");

        assert_eq!(selected.len(), 1);
        assert_relative_eq!(selected[0].jd, 2450001.0);
    }

    #[test]
    fn test_color_lookup() {
        let rows = vec![
            obs(2450001.0, "B", 4380.0, 15.5),
            obs(2450001.0, "V", 5450.0, 15.0),
        ];
        let epochs = group_observations_by_epoch(&rows);
        let (color, color_err) = epochs[0].color("B", "V").unwrap();

        assert_relative_eq!(color, 0.5, epsilon = 1e-12);
        assert_relative_eq!(color_err, (0.05_f64.powi(2) * 2.0).sqrt(), epsilon = 1e-12);
        assert!(epochs[0].color("B", "I").is_none());
    }
}
