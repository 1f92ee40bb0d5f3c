//! High-level runner composing validation, growth and placement into a [`FieldLayout`].
use std::fmt;

use tracing::info;

use crate::config::{FieldConfig, FieldGeometry};
use crate::error::Result;
use crate::layout::events::{EventSink, LayoutEvent, LayoutEventKind};
use crate::layout::growth::grow;
use crate::layout::placement::place;
use crate::layout::{Group, Heliostat};

/// A complete heliostat field layout.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    /// Configuration the layout was generated from.
    pub config: FieldConfig,
    /// Geometry derived from `config`.
    pub geometry: FieldGeometry,
    /// Frozen groups, innermost first.
    pub groups: Vec<Group>,
    /// First ring radius at or beyond `r_max`; no heliostats sit on it.
    pub terminal_radius: f64,
    /// Heliostats in emission order.
    pub heliostats: Vec<Heliostat>,
}

impl FieldLayout {
    /// Summary counts of this layout.
    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            heliostats: self.heliostats.len(),
            groups: self.groups.len(),
            rings: self.groups.iter().map(Group::len).sum(),
            terminal_radius: self.terminal_radius,
            rings_per_group: self.groups.iter().map(Group::len).collect(),
        }
    }

    /// Radii of all placed rings, innermost first.
    pub fn ring_radii(&self) -> impl Iterator<Item = f64> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.rings.iter().map(|r| r.radius))
    }

    /// Heliostats belonging to `group`.
    pub fn heliostats_in_group(&self, group: usize) -> impl Iterator<Item = &Heliostat> + '_ {
        self.heliostats.iter().filter(move |h| h.group == group)
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSummary {
    /// Number of heliostats placed.
    pub heliostats: usize,
    /// Number of groups produced.
    pub groups: usize,
    /// Number of rings placed across all groups.
    pub rings: usize,
    /// Radius at which growth stopped.
    pub terminal_radius: f64,
    pub rings_per_group: Vec<usize>,
}

impl fmt::Display for LayoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "heliostat number: {}", self.heliostats)?;
        write!(f, "group number: {}", self.groups)
    }
}

/// Runs layouts for one configuration.
#[derive(Debug, Clone)]
pub struct LayoutRunner {
    /// Configuration applied to this runner.
    pub config: FieldConfig,
    /// Maximum number of rings kept; `None` derives a bound from the radial span.
    pub ring_capacity: Option<usize>,
}

impl LayoutRunner {
    pub fn try_new(config: FieldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ring_capacity: None,
        })
    }

    pub fn new(config: FieldConfig) -> Self {
        debug_assert!(config.r_min < config.r_max, "r_min must be < r_max");
        debug_assert!(config.psi_max > 0.0, "psi_max must be > 0");

        Self {
            config,
            ring_capacity: None,
        }
    }

    /// Sets the maximum number of rings kept during growth.
    pub fn with_ring_capacity(mut self, ring_capacity: usize) -> Self {
        self.ring_capacity = Some(ring_capacity);
        self
    }

    /// Runs the layout, returning the result.
    pub fn run(&self) -> Result<FieldLayout> {
        run_layout(&self.config, self.ring_capacity, &mut ())
    }

    pub fn run_with_events(&self, sink: &mut dyn EventSink) -> Result<FieldLayout> {
        run_layout(&self.config, self.ring_capacity, sink)
    }
}

/// Generates the layout for `config`.
pub fn generate_layout(config: &FieldConfig) -> Result<FieldLayout> {
    run_layout(config, None, &mut ())
}

/// Generates the layout for `config`, reporting progress to `sink`.
pub fn generate_layout_with_events(
    config: &FieldConfig,
    sink: &mut dyn EventSink,
) -> Result<FieldLayout> {
    run_layout(config, None, sink)
}

fn run_layout(
    config: &FieldConfig,
    ring_capacity: Option<usize>,
    sink: &mut dyn EventSink,
) -> Result<FieldLayout> {
    config.validate()?;

    if sink.wants(LayoutEventKind::RunStarted) {
        sink.send(LayoutEvent::RunStarted {
            config: config.clone(),
        });
    }

    let geometry = FieldGeometry::from_config(config);
    info!(
        "Field {:.1}..{:.1} m, psi_max {:.4} | diameter {:.3} m, ring separation {:.3} m.",
        config.r_min,
        config.r_max,
        config.psi_max,
        geometry.characteristic_diameter,
        geometry.min_ring_separation,
    );

    let growth = grow(config, &geometry, ring_capacity, sink)?;
    let heliostats = place(&growth.groups, &geometry, sink)?;

    let layout = FieldLayout {
        config: config.clone(),
        geometry,
        groups: growth.groups,
        terminal_radius: growth.terminal_radius,
        heliostats,
    };
    let summary = layout.summary();
    info!(
        "Layout: {} heliostats | groups: {} | rings: {} | terminal radius {:.3} m.",
        summary.heliostats, summary.groups, summary.rings, summary.terminal_radius,
    );

    if sink.wants(LayoutEventKind::RunFinished) {
        sink.send(LayoutEvent::RunFinished { summary });
    }

    Ok(layout)
}
