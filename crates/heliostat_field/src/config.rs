//! Field configuration and the geometry scalars derived from it.
//!
//! [`FieldConfig`] is the immutable input of a layout run. [`FieldGeometry`] is computed
//! once from a validated config and carries every scalar the growth and placement
//! phases read.
use std::f64::consts::{FRAC_PI_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Packing angle between a heliostat and its neighbours on the adjacent ring.
pub const PACKING_ANGLE: f64 = PI / 6.0;

/// Heliostat and field geometry for one layout run.
///
/// Lengths are in meters, angles in radians. The default is a reference plant with
/// 2.828 m square heliostats around a 75 m aim point, spanning the full circle between
/// 0.8 and 3.2 aim heights.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Heliostat length.
    pub heliostat_length: f64,
    /// Heliostat width.
    pub heliostat_width: f64,
    /// Height of the heliostat center above its base.
    pub center_height: f64,
    /// Ratio of reflective surface to total heliostat surface, in (0, 1].
    pub reflective_fraction: f64,
    /// Ratio of heliostat separation distance to heliostat length.
    pub separation_ratio: f64,
    /// Receiver height.
    pub receiver_height: f64,
    /// Aim point height on the tower.
    pub aim_height: f64,
    /// Terrain slope rising away from the tower. Signed, within (-pi/2, pi/2).
    pub slope: f64,
    /// Maximum angular half-extent of the field, in (0, pi].
    pub psi_max: f64,
    /// Radius of the innermost ring.
    pub r_min: f64,
    /// Outer radial bound; growth stops at the first ring at or beyond it.
    pub r_max: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let aim_height = 75.0;
        Self {
            heliostat_length: 8.0_f64.sqrt(),
            heliostat_width: 8.0_f64.sqrt(),
            center_height: 7.3,
            reflective_fraction: 1.0,
            separation_ratio: 1.0,
            receiver_height: 12.0,
            aim_height,
            slope: 0.0,
            psi_max: PI,
            r_min: 0.8 * aim_height,
            r_max: 3.2 * aim_height,
        }
    }
}

impl FieldConfig {
    /// Creates a config for `length` x `width` heliostats aimed at `aim_height`, other
    /// values taken from [`FieldConfig::default`].
    pub fn new(heliostat_length: f64, heliostat_width: f64, aim_height: f64) -> Self {
        Self {
            heliostat_length,
            heliostat_width,
            aim_height,
            ..Default::default()
        }
    }

    /// Sets heliostat length and width.
    pub fn with_heliostat_size(mut self, length: f64, width: f64) -> Self {
        self.heliostat_length = length;
        self.heliostat_width = width;
        self
    }

    /// Sets the heliostat center height above its base.
    pub fn with_center_height(mut self, center_height: f64) -> Self {
        self.center_height = center_height;
        self
    }

    /// Sets the reflective-area fraction.
    pub fn with_reflective_fraction(mut self, reflective_fraction: f64) -> Self {
        self.reflective_fraction = reflective_fraction;
        self
    }

    /// Sets the separation-to-length ratio.
    pub fn with_separation_ratio(mut self, separation_ratio: f64) -> Self {
        self.separation_ratio = separation_ratio;
        self
    }

    /// Sets receiver height and aim point height.
    pub fn with_receiver(mut self, receiver_height: f64, aim_height: f64) -> Self {
        self.receiver_height = receiver_height;
        self.aim_height = aim_height;
        self
    }

    /// Sets the terrain slope in radians.
    pub fn with_slope(mut self, slope: f64) -> Self {
        self.slope = slope;
        self
    }

    /// Sets the angular half-extent in radians.
    pub fn with_psi_max(mut self, psi_max: f64) -> Self {
        self.psi_max = psi_max;
        self
    }

    /// Sets the inner and outer radial bounds.
    pub fn with_radial_bounds(mut self, r_min: f64, r_max: f64) -> Self {
        self.r_min = r_min;
        self.r_max = r_max;
        self
    }

    /// Sets the radial bounds as multiples of the current aim height.
    pub fn with_radial_bounds_from_aim_height(mut self, min_factor: f64, max_factor: f64) -> Self {
        self.r_min = min_factor * self.aim_height;
        self.r_max = max_factor * self.aim_height;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    ///
    /// Degenerate radial bounds or angular extent yield [`Error::DegenerateField`];
    /// any other out-of-range value yields [`Error::InvalidConfig`].
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("heliostat_length", self.heliostat_length),
            ("heliostat_width", self.heliostat_width),
            ("center_height", self.center_height),
            ("reflective_fraction", self.reflective_fraction),
            ("separation_ratio", self.separation_ratio),
            ("receiver_height", self.receiver_height),
            ("aim_height", self.aim_height),
            ("r_min", self.r_min),
            ("r_max", self.r_max),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and > 0 (got {value})"
                )));
            }
        }
        if self.reflective_fraction > 1.0 {
            return Err(Error::InvalidConfig(format!(
                "reflective_fraction must be <= 1 (got {})",
                self.reflective_fraction
            )));
        }
        if !self.slope.is_finite() || self.slope.abs() >= FRAC_PI_2 {
            return Err(Error::InvalidConfig(format!(
                "slope must be within (-pi/2, pi/2) (got {})",
                self.slope
            )));
        }
        if !self.psi_max.is_finite()
            || self.psi_max <= 0.0
            || self.psi_max > PI
            || self.r_min >= self.r_max
        {
            return Err(Error::DegenerateField {
                r_min: self.r_min,
                r_max: self.r_max,
                psi_max: self.psi_max,
            });
        }

        Ok(())
    }
}

/// Scalars derived once from a [`FieldConfig`], plus the raw values the solvers read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGeometry {
    /// Heliostat width over length.
    pub aspect_ratio: f64,
    /// Net reflective area of one heliostat.
    pub net_area: f64,
    /// Height of the receiver bottom edge.
    pub receiver_bottom: f64,
    /// Radius of the circle representing a heliostat in front view.
    pub circle_radius: f64,
    /// Minimum center-to-center spacing between heliostats.
    pub characteristic_diameter: f64,
    /// Minimum radial distance between adjacent rings.
    pub min_ring_separation: f64,
    pub center_height: f64,
    pub psi_max: f64,
    pub tan_slope: f64,
    pub cos_slope: f64,
}

impl FieldGeometry {
    /// Derives the geometry of `config`. The config is expected to be validated.
    pub fn from_config(config: &FieldConfig) -> Self {
        let lm = config.heliostat_length;
        let wm = config.heliostat_width;
        let aspect_ratio = wm / lm;
        let characteristic_diameter =
            (lm * ((1.0 + aspect_ratio * aspect_ratio).sqrt() + config.separation_ratio))
                .max(2.0 * wm);
        let cos_slope = config.slope.cos();

        Self {
            aspect_ratio,
            net_area: aspect_ratio * config.reflective_fraction * lm * lm,
            receiver_bottom: config.aim_height - 0.5 * config.receiver_height,
            circle_radius: 0.5 * lm,
            characteristic_diameter,
            min_ring_separation: characteristic_diameter * PACKING_ANGLE.cos() * cos_slope,
            center_height: config.center_height,
            psi_max: config.psi_max,
            tan_slope: config.slope.tan(),
            cos_slope,
        }
    }

    /// Height of a heliostat center standing on ring `radius`.
    #[inline]
    pub fn height_at(&self, radius: f64) -> f64 {
        self.center_height + radius * self.tan_slope
    }

    /// Angular unit for a group whose first ring sits at `radius`.
    #[inline]
    pub fn angular_unit(&self, radius: f64) -> f64 {
        0.5 * self.characteristic_diameter / radius
    }
}
