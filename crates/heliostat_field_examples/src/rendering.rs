use std::path::Path;

use glam::DVec2;
use heliostat_field::prelude::*;
use image::{Rgb, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// How heliostats are drawn.
#[derive(Clone, Debug)]
pub struct HeliostatStyle {
    /// Colors cycled per group.
    pub palette: Vec<[u8; 3]>,
    /// Disc radius in pixels.
    pub radius: i32,
}

impl Default for HeliostatStyle {
    fn default() -> Self {
        Self {
            palette: vec![
                [66, 133, 244],
                [234, 67, 53],
                [251, 188, 5],
                [52, 168, 83],
                [171, 71, 188],
                [0, 172, 193],
            ],
            radius: 2,
        }
    }
}

/// Top-down preview settings. The tower sits at the image center, +y points up.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// Half-width of the rendered square, in meters.
    pub half_extent: f64,
    pub background: [u8; 3],
    pub tower_color: [u8; 3],
    pub style: HeliostatStyle,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), half_extent: f64) -> Self {
        Self {
            image_size,
            half_extent,
            background: [24, 24, 24],
            tower_color: [255, 255, 255],
            style: HeliostatStyle::default(),
        }
    }

    /// Fits the rendered square to the outermost ring of `layout`.
    pub fn fit_layout(image_size: (u32, u32), layout: &FieldLayout) -> Self {
        let outer = layout.ring_radii().fold(layout.config.r_min, f64::max);
        Self::new(
            image_size,
            outer + 2.0 * layout.geometry.characteristic_diameter,
        )
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_style(mut self, style: HeliostatStyle) -> Self {
        self.style = style;
        self
    }

    fn to_pixel(&self, p: DVec2) -> (i32, i32) {
        let (w, h) = self.image_size;
        let span = 2.0 * self.half_extent;
        let u = (p.x + self.half_extent) / span;
        let v = (self.half_extent - p.y) / span;
        ((u * w as f64) as i32, (v * h as f64) as i32)
    }
}

/// Renders `layout` as a PNG at `path`, coloring heliostats by group.
pub fn render_layout_to_png(
    layout: &FieldLayout,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        config.half_extent > 0.0,
        "half_extent must be > 0 (got {})",
        config.half_extent
    );
    let (w, h) = config.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    let palette = &config.style.palette;
    for heliostat in &layout.heliostats {
        let color = if palette.is_empty() {
            [255, 255, 255]
        } else {
            palette[heliostat.group % palette.len()]
        };
        let center = config.to_pixel(heliostat.position.truncate());
        fill_disc(&mut img, center, config.style.radius, color);
    }

    let tower = config.to_pixel(DVec2::ZERO);
    fill_disc(&mut img, tower, config.style.radius * 2 + 1, config.tower_color);

    img.save(path.as_ref())?;
    info!(
        "Rendered {} heliostats to {}.",
        layout.heliostats.len(),
        path.as_ref().display()
    );
    Ok(())
}

fn fill_disc(img: &mut RgbImage, (cx, cy): (i32, i32), radius: i32, color: [u8; 3]) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && x < w && y < h {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}
