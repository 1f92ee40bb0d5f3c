//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid or degenerate configuration, numeric failures inside a named layout stage,
//! exhausted growth capacity, and CSV/IO output failures.
use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("degenerate field: r_min={r_min}, r_max={r_max}, psi_max={psi_max} (need r_min < r_max and 0 < psi_max <= pi)")]
    DegenerateField { r_min: f64, r_max: f64, psi_max: f64 },

    #[error("configuration error in {stage} (group {group}, ring {ring}, radius {radius}): {issue}")]
    Configuration {
        stage: Stage,
        group: usize,
        ring: usize,
        radius: f64,
        issue: NumericIssue,
    },

    #[error("ring capacity of {limit} exceeded at group {group}, ring {ring} (radius {radius})")]
    Capacity {
        limit: usize,
        group: usize,
        ring: usize,
        radius: f64,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Layout computation that produced a [`NumericIssue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    NextRingRadius,
    ViewLimitedRadius,
    MirrorDensity,
    Placement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NextRingRadius => "next-ring radius",
            Stage::ViewLimitedRadius => "view-limited radius",
            Stage::MirrorDensity => "mirror density",
            Stage::Placement => "placement",
        };
        f.write_str(name)
    }
}

/// Numeric failure reported by the solver helpers, before group/ring context is attached.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum NumericIssue {
    #[error("negative discriminant {value}")]
    NegativeDiscriminant { value: f64 },

    #[error("quadratic leading coefficient is zero")]
    DegenerateQuadratic,

    #[error("non-finite result")]
    NonFinite,

    #[error("non-positive land area {area}")]
    NonPositiveArea { area: f64 },

    #[error("angular clearance {clearance} exceeds angular extent {psi_max}")]
    AngularExtentTooSmall { clearance: f64, psi_max: f64 },

    #[error("radius {next} does not exceed previous radius {previous}")]
    NonIncreasingRadius { previous: f64, next: f64 },
}

impl NumericIssue {
    /// Attach stage and position context, turning the issue into a crate [`Error`].
    pub fn at(self, stage: Stage, group: usize, ring: usize, radius: f64) -> Error {
        Error::Configuration {
            stage,
            group,
            ring,
            radius,
            issue: self,
        }
    }
}
