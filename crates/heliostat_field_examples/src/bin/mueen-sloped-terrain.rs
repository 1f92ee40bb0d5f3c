use heliostat_field::prelude::*;
use heliostat_field_examples::init_tracing;

const SLOPES_DEG: [f64; 5] = [-6.0, -3.0, 0.0, 3.0, 6.0];

fn main() -> anyhow::Result<()> {
    init_tracing();

    println!("slope_deg  heliostats  groups  rings  terminal_radius  outer_z");
    for slope_deg in SLOPES_DEG {
        let config = FieldConfig::default().with_slope(slope_deg.to_radians());
        let layout = generate_layout(&config)?;
        let summary = layout.summary();
        let outer_z = layout
            .heliostats
            .last()
            .map(|h| h.position.z)
            .unwrap_or(config.center_height);

        println!(
            "{:>9.1}  {:>10}  {:>6}  {:>5}  {:>15.3}  {:>7.3}",
            slope_deg,
            summary.heliostats,
            summary.groups,
            summary.rings,
            summary.terminal_radius,
            outer_z
        );
        write_csv_to_path(&layout, format!("mueen-slope-{slope_deg:+.0}.csv"))?;
    }
    Ok(())
}
