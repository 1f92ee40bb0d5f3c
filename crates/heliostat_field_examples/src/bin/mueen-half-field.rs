use std::f64::consts::FRAC_PI_2;

use heliostat_field::prelude::*;
use heliostat_field_examples::{init_tracing, render_layout_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // North field only: heliostats within +-90 degrees of the field axis.
    let config = FieldConfig::default()
        .with_psi_max(FRAC_PI_2)
        .with_radial_bounds_from_aim_height(0.8, 4.0);
    let layout = LayoutRunner::try_new(config)?.run()?;

    write_csv_to_path(&layout, "mueen-half-field.csv")?;
    println!("{}", layout.summary());

    let rc = RenderConfig::fit_layout((1000, 1000), &layout).with_background([236, 238, 242]);
    render_layout_to_png(&layout, &rc, "mueen-half-field.png")?;
    Ok(())
}
