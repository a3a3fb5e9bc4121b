//! Compute all three bolometric light curves for the bundled demo catalog.
//!
//! Run with `cargo run --example lightcurve`. Set `RUST_LOG=debug` to see
//! per-epoch pipeline decisions.

use bolcurve::{LightCurvePoint, Supernova};

fn print_lightcurve(title: &str, lightcurve: &[LightCurvePoint]) {
    println!("{title}");
    println!(
        "{:>12} {:>9} {:>6} {:>12} {:>11}",
        "JD", "phase", "±", "L (erg/s)", "±"
    );
    for point in lightcurve {
        println!(
            "{:>12.2} {:>9.2} {:>6.2} {:>12.4e} {:>11.2e}",
            point.jd, point.phase, point.phase_err, point.luminosity, point.luminosity_err
        );
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut sn = Supernova::new("sn2004et", "src/store/test_data/demo_catalog.json");

    let quasi = sn.compute_quasi_bolometric()?;
    print_lightcurve("Quasi-bolometric (observed wavelengths only)", &quasi);

    let direct = sn.compute_direct_bolometric()?;
    print_lightcurve("Direct integration with UV/IR corrections", &direct);

    let color = sn.compute_color_bolometric("B", "V")?;
    print_lightcurve("Bolometric correction from B-V", &color);

    Ok(())
}
