use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use heliostat_field::prelude::*;
use heliostat_field_examples::{init_tracing, render_layout_to_png, RenderConfig};

/// Generate a ring-and-group heliostat field layout and write it as CSV.
#[derive(Parser)]
#[command(name = "heliostat-field")]
struct Cli {
    /// RON file with a field configuration; omitted values use the reference plant
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the innermost ring radius (m)
    #[arg(long)]
    r_min: Option<f64>,

    /// Override the outer radial bound (m)
    #[arg(long)]
    r_max: Option<f64>,

    /// Override the terrain slope (degrees, rising away from the tower)
    #[arg(long)]
    slope_deg: Option<f64>,

    /// Override the angular half-extent (degrees, 0 < psi <= 180)
    #[arg(long)]
    psi_max_deg: Option<f64>,

    /// Maximum number of rings to keep before failing
    #[arg(long)]
    ring_capacity: Option<usize>,

    /// CSV output path
    #[arg(short, long, default_value = "output.csv")]
    output: PathBuf,

    /// Optional PNG preview path
    #[arg(long)]
    png: Option<PathBuf>,

    /// Preview image size in pixels
    #[arg(long, default_value = "1000")]
    image_size: u32,
}

fn load_config(cli: &Cli) -> anyhow::Result<FieldConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ron::from_str::<FieldConfig>(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => FieldConfig::default(),
    };

    if cli.r_min.is_some() || cli.r_max.is_some() {
        let r_min = cli.r_min.unwrap_or(config.r_min);
        let r_max = cli.r_max.unwrap_or(config.r_max);
        config = config.with_radial_bounds(r_min, r_max);
    }
    if let Some(slope) = cli.slope_deg {
        config = config.with_slope(slope.to_radians());
    }
    if let Some(psi) = cli.psi_max_deg {
        config = config.with_psi_max(psi.to_radians());
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let mut runner = LayoutRunner::try_new(config)?;
    if let Some(capacity) = cli.ring_capacity {
        runner = runner.with_ring_capacity(capacity);
    }
    let layout = runner.run()?;

    write_csv_to_path(&layout, &cli.output)?;
    println!("{}", layout.summary());

    if let Some(png) = &cli.png {
        let rc = RenderConfig::fit_layout((cli.image_size, cli.image_size), &layout);
        render_layout_to_png(&layout, &rc, png)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("heliostat-field").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn single_radial_override_keeps_other_bound() {
        let config = load_config(&parse(&["--r-max", "300"])).unwrap();
        assert_eq!(config.r_min, 60.0);
        assert_eq!(config.r_max, 300.0);

        let config = load_config(&parse(&["--r-min", "40"])).unwrap();
        assert_eq!(config.r_min, 40.0);
        assert_eq!(config.r_max, 240.0);
    }

    #[test]
    fn angle_overrides_are_in_degrees() {
        let config = load_config(&parse(&["--slope-deg", "3", "--psi-max-deg", "90"])).unwrap();
        assert!((config.slope - 3.0_f64.to_radians()).abs() < 1e-15);
        assert!((config.psi_max - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert_eq!(parse(&[]).output, PathBuf::from("output.csv"));
    }
}
