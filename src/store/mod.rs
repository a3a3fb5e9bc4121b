//! Read-only photometry catalog access
//!
//! The catalog is a hierarchical JSON document with one global filter table
//! and a map of supernovae, each holding named photometry tables and a
//! parameter record:
//!
//! ```json
//! {
//!   "filters": [
//!     { "name": "V", "eff_wl": 5450.0, "flux_zeropoint": 3.631e-9, "filter_id": 2 }
//!   ],
//!   "supernovae": {
//!     "sn1998a": {
//!       "photometry": {
//!         "primary": [
//!           { "jd": 2450835.5, "filter_id": 2, "magnitude": 15.12, "uncertainty": 0.05 }
//!         ]
//!       },
//!       "parameters": {
//!         "explosion_jd": 2450801.0, "explosion_jd_err": 2.0,
//!         "av_gal": 0.15, "av_host": 0.0,
//!         "distance_mpc": 30.0, "distance_mpc_err": 3.0
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Photometry rows are joined against the filter table when read; a row
//! referencing an unknown filter id is a hard error rather than a silent
//! drop.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::photometry::{FilterDescriptor, Observation};
use crate::units::mpc_to_cm;

/// Error type for catalog access
#[derive(Debug, Error)]
pub enum StoreError {
    /// The catalog file could not be read
    #[error("cannot read catalog {path:?}: {source}")]
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The catalog is not valid JSON or does not match the schema
    #[error("malformed catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The requested object has no entry in the catalog
    #[error("object not found in catalog: {0}")]
    ObjectNotFound(String),

    /// A photometry row references a filter id missing from the filter table
    #[error("photometry row references unknown filter id {0}")]
    FilterNotFound(u32),
}

/// Per-object scalar parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectParameters {
    /// Julian date of the explosion
    pub explosion_jd: f64,
    /// 1-σ uncertainty on the explosion date, days
    pub explosion_jd_err: f64,
    /// Galactic extinction A_V toward the object, magnitudes
    pub av_gal: f64,
    /// Host-galaxy extinction A_V, magnitudes
    pub av_host: f64,
    /// Distance in megaparsecs
    pub distance_mpc: f64,
    /// 1-σ distance uncertainty, megaparsecs
    pub distance_mpc_err: f64,
}

impl ObjectParameters {
    /// Total visual extinction, A_V(galactic) + A_V(host).
    ///
    /// The two contributions are never used separately downstream.
    pub fn av_total(&self) -> f64 {
        self.av_gal + self.av_host
    }

    /// Distance and its uncertainty in centimeters.
    pub fn distance_cm(&self) -> (f64, f64) {
        (mpc_to_cm(self.distance_mpc), mpc_to_cm(self.distance_mpc_err))
    }
}

/// One row of a photometry table, before the filter join.
#[derive(Debug, Clone, Deserialize)]
struct PhotometryRow {
    jd: f64,
    filter_id: u32,
    magnitude: f64,
    uncertainty: f64,
}

/// One supernova's node: named photometry tables plus parameters.
#[derive(Debug, Clone, Deserialize)]
struct ObjectNode {
    // BTreeMap keeps table iteration order deterministic
    photometry: BTreeMap<String, Vec<PhotometryRow>>,
    parameters: ObjectParameters,
}

/// An in-memory snapshot of the catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    filters: Vec<FilterDescriptor>,
    supernovae: HashMap<String, ObjectNode>,
}

impl Catalog {
    /// Read and parse a catalog file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| StoreError::FileError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Parse a catalog from a JSON string (tests and demos).
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The global filter reference table.
    pub fn filters(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    /// Indexed lookup into the filter table.
    pub fn filter_by_id(&self, filter_id: u32) -> Option<&FilterDescriptor> {
        self.filters.iter().find(|f| f.filter_id == filter_id)
    }

    /// Parameter record for a named object.
    pub fn parameters(&self, name: &str) -> Result<&ObjectParameters, StoreError> {
        self.supernovae
            .get(name)
            .map(|node| &node.parameters)
            .ok_or_else(|| StoreError::ObjectNotFound(name.to_string()))
    }

    /// Photometry tables for a named object, joined against the filter
    /// table. One `Vec<Observation>` per source table, in table-name order.
    pub fn photometry_tables(&self, name: &str) -> Result<Vec<Vec<Observation>>, StoreError> {
        let node = self
            .supernovae
            .get(name)
            .ok_or_else(|| StoreError::ObjectNotFound(name.to_string()))?;

        node.photometry
            .values()
            .map(|rows| {
                rows.iter()
                    .map(|row| {
                        let filter = self
                            .filter_by_id(row.filter_id)
                            .ok_or(StoreError::FilterNotFound(row.filter_id))?;
                        Ok(Observation {
                            jd: row.jd,
                            filter: filter.clone(),
                            magnitude: row.magnitude,
                            uncertainty: row.uncertainty,
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CATALOG: &str = r#"{
        "filters": [
            { "name": "B", "eff_wl": 4380.0, "flux_zeropoint": 6.32e-9, "filter_id": 1 },
            { "name": "V", "eff_wl": 5450.0, "flux_zeropoint": 3.631e-9, "filter_id": 2 }
        ],
        "supernovae": {
            "sn1998a": {
                "photometry": {
                    "primary": [
                        { "jd": 2450835.5, "filter_id": 2, "magnitude": 15.12, "uncertainty": 0.05 },
                        { "jd": 2450835.5, "filter_id": 1, "magnitude": 15.60, "uncertainty": 0.04 }
                    ],
                    "secondary": [
                        { "jd": 2450836.5, "filter_id": 2, "magnitude": 15.20, "uncertainty": 0.06 }
                    ]
                },
                "parameters": {
                    "explosion_jd": 2450801.0, "explosion_jd_err": 2.0,
                    "av_gal": 0.15, "av_host": 0.05,
                    "distance_mpc": 30.0, "distance_mpc_err": 3.0
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_and_lookup() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.filters().len(), 2);
        assert_eq!(catalog.filter_by_id(2).unwrap().name, "V");
        assert!(catalog.filter_by_id(9).is_none());
    }

    #[test]
    fn test_parameters() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let params = catalog.parameters("sn1998a").unwrap();
        assert_relative_eq!(params.av_total(), 0.2, epsilon = 1e-12);
        let (d, d_err) = params.distance_cm();
        assert_relative_eq!(d, 30.0 * 3.085_677_58e24, max_relative = 1e-12);
        assert_relative_eq!(d_err, 3.0 * 3.085_677_58e24, max_relative = 1e-12);
    }

    #[test]
    fn test_photometry_join() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let tables = catalog.photometry_tables("sn1998a").unwrap();
        // Table-name order: primary, secondary
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(tables[0][0].filter.name, "V");
        assert_relative_eq!(tables[0][1].filter.eff_wl, 4380.0);
        assert_eq!(tables[1].len(), 1);
    }

    #[test]
    fn test_object_not_found() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        match catalog.parameters("sn2099zz") {
            Err(StoreError::ObjectNotFound(name)) => assert_eq!(name, "sn2099zz"),
            other => panic!("expected ObjectNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_filter_id_fails_fast() {
        // Rewrite the B photometry row to reference an id missing from the
        // filter table (the table row itself ends in "1 }" and is untouched)
        let broken = CATALOG.replace("\"filter_id\": 1,", "\"filter_id\": 7,");
        let catalog = Catalog::from_json_str(&broken).unwrap();
        match catalog.photometry_tables("sn1998a") {
            Err(StoreError::FilterNotFound(7)) => {}
            other => panic!("expected FilterNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        match Catalog::open("/nonexistent/catalog.json") {
            Err(StoreError::FileError { .. }) => {}
            other => panic!("expected FileError, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        match Catalog::from_json_str("{ not json") {
            Err(StoreError::ParseError(_)) => {}
            other => panic!("expected ParseError, got {other:?}"),
        }
    }
}
