use heliostat_field::prelude::*;
use heliostat_field_examples::{init_tracing, render_layout_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // 2.828 m square heliostats around a 75 m aim point, full circle from 60 m to 240 m.
    let config = FieldConfig::default();
    let layout = generate_layout(&config)?;

    write_csv_to_path(&layout, "output.csv")?;
    println!("{}", layout.summary());

    let rc = RenderConfig::fit_layout((1000, 1000), &layout);
    render_layout_to_png(&layout, &rc, "mueen-reference-field.png")?;
    Ok(())
}
