//! Light-curve text export
//!
//! Thin formatting layer over the computed light curve: one
//! whitespace-delimited row per point, columns
//! `jd phase phase_err luminosity luminosity_err`. Not part of the
//! numerical core's contract.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::supernova::LightCurvePoint;

/// Write a light curve to any writer, one space-delimited row per point.
pub fn write_lightcurve<W: io::Write>(
    writer: W,
    lightcurve: &[LightCurvePoint],
) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .from_writer(writer);
    for point in lightcurve {
        out.serialize(point)?;
    }
    out.flush()?;
    Ok(())
}

/// Write a light curve to a file on disk.
pub fn write_lightcurve_to_path(
    path: impl AsRef<Path>,
    lightcurve: &[LightCurvePoint],
) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    write_lightcurve(file, lightcurve)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<LightCurvePoint> {
        vec![
            LightCurvePoint {
                jd: 2450001.0,
                phase: 0.0,
                phase_err: 1.5,
                luminosity: 1.2e42,
                luminosity_err: 4.0e40,
            },
            LightCurvePoint {
                jd: 2450004.0,
                phase: 3.0,
                phase_err: 1.5,
                luminosity: 9.8e41,
                luminosity_err: 3.6e40,
            },
        ]
    }

    #[test]
    fn test_one_row_per_point() {
        let mut buffer = Vec::new();
        write_lightcurve(&mut buffer, &sample()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_rows_have_five_columns() {
        let mut buffer = Vec::new();
        write_lightcurve(&mut buffer, &sample()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        for line in text.lines() {
            assert_eq!(line.split(' ').count(), 5, "bad row: {line}");
        }
    }

    #[test]
    fn test_values_roundtrip() {
        let points = sample();
        let mut buffer = Vec::new();
        write_lightcurve(&mut buffer, &points).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let first: Vec<f64> = text
            .lines()
            .next()
            .unwrap()
            .split(' ')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(first[0], points[0].jd);
        assert_eq!(first[3], points[0].luminosity);
    }

    #[test]
    fn test_empty_lightcurve_writes_nothing() {
        let mut buffer = Vec::new();
        write_lightcurve(&mut buffer, &[]).unwrap();
        assert!(buffer.is_empty());
    }
}
