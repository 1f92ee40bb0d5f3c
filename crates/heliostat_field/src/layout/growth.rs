//! Growth phase: decides ring radii per group until the outer radial bound is reached.
//!
//! Each step either extends the current group by one ring or closes it and opens a new
//! group, whichever yields the higher mirror density. The first ring at or beyond
//! `r_max` ends the phase and is reported as the terminal radius without being kept.
use tracing::debug;

use crate::config::{FieldConfig, FieldGeometry};
use crate::error::{Error, Result, Stage};
use crate::layout::events::{EventSink, LayoutEvent, LayoutEventKind};
use crate::layout::solver::{
    candidate_radius, heliostats_in_ring, mirror_density, next_ring_radius, AreaEstimate,
};
use crate::layout::{Group, RingKind};

/// Frozen result of the growth phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Growth {
    /// Groups ordered by radius; none of them is empty.
    pub groups: Vec<Group>,
    /// First ring radius at or beyond `r_max`. Not part of any group.
    pub terminal_radius: f64,
    /// Ring radii computed, including the seed and the terminal ring.
    pub evaluations: usize,
}

impl Growth {
    /// Total number of rings kept across all groups.
    pub fn ring_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}

/// Upper bound on the number of rings that fit between the radial bounds when every
/// ring advances by at least the minimum ring separation.
pub fn ring_budget(config: &FieldConfig, geometry: &FieldGeometry) -> usize {
    let span = config.r_max - config.r_min;
    (span / geometry.min_ring_separation).ceil() as usize + 2
}

/// Rough number of groups, used to size storage up front.
fn group_capacity_hint(config: &FieldConfig, geometry: &FieldGeometry) -> usize {
    ((config.r_max - config.r_min) / geometry.characteristic_diameter) as usize + 1
}

/// Outcome of one growth decision.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// Append a ring at `radius` to the current group.
    Extend { radius: f64 },
    /// Close the current group and open one with `angular_unit` at `radius`.
    Open { angular_unit: f64, radius: f64 },
}

struct GrowthState {
    finished: Vec<Group>,
    current: Group,
    evaluations: usize,
    stored: usize,
    capacity: usize,
}

impl GrowthState {
    fn seed(config: &FieldConfig, geometry: &FieldGeometry, capacity: usize) -> Self {
        Self {
            finished: Vec::with_capacity(group_capacity_hint(config, geometry)),
            current: Group::new(geometry.angular_unit(config.r_min), config.r_min),
            evaluations: 1,
            stored: 1,
            capacity,
        }
    }

    fn group_index(&self) -> usize {
        self.finished.len()
    }

    fn decide(&self, geometry: &FieldGeometry) -> Result<Step> {
        let group = self.group_index();
        let rings = &self.current.rings;
        let index = rings.len() - 1;
        let current = rings[index].radius;
        let unit = self.current.angular_unit;

        if index == 0 {
            let radius = next_ring_radius(current, unit, geometry)
                .map_err(|e| e.at(Stage::NextRingRadius, group, 1, current))?;
            return Ok(Step::Extend { radius });
        }

        let previous = rings[index - 1].radius;
        let stay = candidate_radius(previous, current, geometry)
            .map_err(|e| e.at(Stage::ViewLimitedRadius, group, index + 1, previous))?;
        let stay_count = heliostats_in_ring(RingKind::for_index(index), unit, geometry.psi_max);
        let stay_density =
            mirror_density(stay_count, current, stay, AreaEstimate::Truncated, geometry)
            .map_err(|e| e.at(Stage::MirrorDensity, group, index + 1, stay))?;

        let open = candidate_radius(current, current, geometry)
            .map_err(|e| e.at(Stage::ViewLimitedRadius, group + 1, 0, current))?;
        let open_unit = geometry.angular_unit(open);
        let open_count = heliostats_in_ring(RingKind::Essential, open_unit, geometry.psi_max);
        let open_density =
            mirror_density(open_count, current, open, AreaEstimate::Exact, geometry)
            .map_err(|e| e.at(Stage::MirrorDensity, group + 1, 0, open))?;

        debug!(
            "Group {} ring {}: stay {:.3} (density {:.6}) vs open {:.3} (density {:.6}).",
            group,
            index + 1,
            stay,
            stay_density,
            open,
            open_density
        );

        if stay_density >= open_density {
            Ok(Step::Extend { radius: stay })
        } else {
            Ok(Step::Open {
                angular_unit: open_unit,
                radius: open,
            })
        }
    }

    fn reserve_ring(&mut self, group: usize, ring: usize, radius: f64) -> Result<()> {
        if self.stored >= self.capacity {
            return Err(Error::Capacity {
                limit: self.capacity,
                group,
                ring,
                radius,
            });
        }
        self.stored += 1;
        Ok(())
    }
}

/// Runs the growth phase for a validated `config`.
///
/// `capacity` caps the number of rings kept; `None` uses [`ring_budget`]. Exceeding the
/// cap yields [`Error::Capacity`].
pub fn grow(
    config: &FieldConfig,
    geometry: &FieldGeometry,
    capacity: Option<usize>,
    sink: &mut dyn EventSink,
) -> Result<Growth> {
    let capacity = capacity.unwrap_or_else(|| ring_budget(config, geometry));
    let mut state = GrowthState::seed(config, geometry, capacity);

    if sink.wants(LayoutEventKind::GroupOpened) {
        sink.send(LayoutEvent::GroupOpened {
            group: 0,
            angular_unit: state.current.angular_unit,
            first_radius: config.r_min,
        });
    }

    let terminal_radius = loop {
        let step = state.decide(geometry)?;
        state.evaluations += 1;
        let group = state.group_index();

        match step {
            Step::Extend { radius } => {
                if radius >= config.r_max {
                    break radius;
                }
                let ring = state.current.len();
                state.reserve_ring(group, ring, radius)?;
                state.current.push_ring(radius);
                if sink.wants(LayoutEventKind::RingAdded) {
                    sink.send(LayoutEvent::RingAdded {
                        group,
                        ring,
                        radius,
                        kind: RingKind::for_index(ring),
                    });
                }
            }
            Step::Open {
                angular_unit,
                radius,
            } => {
                let last = state.current.last_radius().unwrap_or(config.r_min);
                let mut first = radius;
                if first - last < geometry.characteristic_diameter {
                    first = last + geometry.characteristic_diameter;
                    debug!(
                        "Group {}: first ring moved from {:.3} to {:.3}.",
                        group + 1,
                        radius,
                        first
                    );
                    if sink.wants(LayoutEventKind::GapCorrected) {
                        sink.send(LayoutEvent::GapCorrected {
                            group: group + 1,
                            computed: radius,
                            corrected: first,
                        });
                    }
                }

                let rings = state.current.len();
                let next = Group::new(angular_unit, first);
                let done = std::mem::replace(&mut state.current, next);
                state.finished.push(done);
                debug!("Group {} finished with {} rings.", group, rings);
                if sink.wants(LayoutEventKind::GroupFinished) {
                    sink.send(LayoutEvent::GroupFinished { group, rings });
                }

                if first >= config.r_max {
                    // The new group never received a ring below the bound.
                    state.current.rings.clear();
                    break first;
                }
                state.reserve_ring(group + 1, 0, first)?;
                if sink.wants(LayoutEventKind::GroupOpened) {
                    sink.send(LayoutEvent::GroupOpened {
                        group: group + 1,
                        angular_unit,
                        first_radius: first,
                    });
                }
            }
        }
    };

    let GrowthState {
        mut finished,
        current,
        evaluations,
        ..
    } = state;
    if !current.is_empty() {
        let group = finished.len();
        let rings = current.len();
        finished.push(current);
        if sink.wants(LayoutEventKind::GroupFinished) {
            sink.send(LayoutEvent::GroupFinished { group, rings });
        }
    }

    if sink.wants(LayoutEventKind::GrowthTerminated) {
        sink.send(LayoutEvent::GrowthTerminated {
            terminal_radius,
            groups: finished.len(),
        });
    }

    Ok(Growth {
        groups: finished,
        terminal_radius,
        evaluations,
    })
}
