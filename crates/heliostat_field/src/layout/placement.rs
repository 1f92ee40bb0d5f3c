//! Placement phase: turns frozen groups into heliostat positions.
//!
//! Essential rings take the even angular slots `0, 2γ, 4γ, …` with a single heliostat on
//! the field axis; staggered rings take the odd slots `γ, 3γ, …`. Every off-axis slot is
//! emitted together with its mirror image, right after it.
use glam::DVec3;
use tracing::warn;

use crate::config::FieldGeometry;
use crate::error::{NumericIssue, Result, Stage};
use crate::layout::events::{EventSink, LayoutEvent, LayoutEventKind};
use crate::layout::{Group, Heliostat, Ring, RingKind};

/// Highest angular slot index for a group with `unit` whose heliostat, including half a
/// characteristic diameter of clearance on the outermost ring at `outer`, stays within
/// the angular half-extent.
pub fn max_angular_index(
    unit: f64,
    outer: f64,
    geometry: &FieldGeometry,
) -> std::result::Result<usize, NumericIssue> {
    let clearance = (0.5 * geometry.characteristic_diameter / outer).atan();
    if clearance > geometry.psi_max {
        return Err(NumericIssue::AngularExtentTooSmall {
            clearance,
            psi_max: geometry.psi_max,
        });
    }

    let mut max_index = (geometry.psi_max / unit).floor() as usize;
    while max_index > 0 && max_index as f64 * unit + clearance > geometry.psi_max {
        max_index -= 1;
    }
    Ok(max_index)
}

/// Places the heliostats of all `groups`, assigning ids from 1 in emission order.
pub fn place(
    groups: &[Group],
    geometry: &FieldGeometry,
    sink: &mut dyn EventSink,
) -> Result<Vec<Heliostat>> {
    let mut heliostats = Vec::new();

    for (group_index, group) in groups.iter().enumerate() {
        let Some(outer) = group.last_radius() else {
            continue;
        };
        let max_index = max_angular_index(group.angular_unit, outer, geometry)
            .map_err(|e| e.at(Stage::Placement, group_index, group.len() - 1, outer))?;

        if max_index == 0 && group.len() > 1 {
            warn!(
                "Group {} only fits the axis slot; its staggered rings stay empty.",
                group_index
            );
            if sink.wants(LayoutEventKind::Warning) {
                sink.send(LayoutEvent::Warning {
                    context: format!("group:{group_index}"),
                    message: "Angular extent only fits the axis slot; staggered rings stay empty"
                        .into(),
                });
            }
        }

        let before = heliostats.len();
        for (ring_index, ring) in group.rings.iter().enumerate() {
            emit_ring(
                &mut heliostats,
                ring,
                group_index,
                ring_index,
                group.angular_unit,
                max_index,
                geometry,
            );
        }

        if sink.wants(LayoutEventKind::GroupPlaced) {
            sink.send(LayoutEvent::GroupPlaced {
                group: group_index,
                heliostats: heliostats.len() - before,
                max_index,
            });
        }
    }

    Ok(heliostats)
}

fn emit_ring(
    out: &mut Vec<Heliostat>,
    ring: &Ring,
    group: usize,
    ring_index: usize,
    angular_unit: f64,
    max_index: usize,
    geometry: &FieldGeometry,
) {
    let start = match ring.kind {
        RingKind::Essential => 0,
        RingKind::Staggered => 1,
    };
    let z = geometry.height_at(ring.radius);

    for slot in (start..=max_index).step_by(2) {
        let azimuth = slot as f64 * angular_unit;
        let (sin, cos) = azimuth.sin_cos();
        let x = ring.radius * sin;
        let y = ring.radius * cos;

        push(out, DVec3::new(x, y, z), group, ring_index, azimuth);
        if slot > 0 {
            push(out, DVec3::new(-x, y, z), group, ring_index, -azimuth);
        }
    }
}

#[inline]
fn push(out: &mut Vec<Heliostat>, position: DVec3, group: usize, ring: usize, azimuth: f64) {
    out.push(Heliostat {
        id: out.len() + 1,
        position,
        group,
        ring,
        azimuth,
    });
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::config::FieldConfig;
    use crate::layout::events::VecSink;

    fn geometry(config: &FieldConfig) -> FieldGeometry {
        FieldGeometry::from_config(config)
    }

    fn two_ring_group(geometry: &FieldGeometry) -> Group {
        let mut group = Group::new(geometry.angular_unit(60.0), 60.0);
        group.push_ring(66.0);
        group
    }

    #[test]
    fn max_index_respects_clearance() {
        let geometry = geometry(&FieldConfig::default());
        let group = two_ring_group(&geometry);
        let max_index = max_angular_index(group.angular_unit, 66.0, &geometry).unwrap();
        // floor(pi / unit) = 55, clearance pushes the last slot past pi
        assert_eq!(max_index, 54);
        let clearance = (0.5 * geometry.characteristic_diameter / 66.0).atan();
        assert!(max_index as f64 * group.angular_unit + clearance <= PI);
    }

    #[test]
    fn max_index_uses_outermost_ring() {
        let geometry = geometry(&FieldConfig::default());
        let mut group = Group::new(geometry.angular_unit(101.0), 101.0);
        group.push_ring(121.0);
        group.push_ring(141.0);

        // The innermost ring alone would only admit slot 91.
        assert_eq!(max_angular_index(group.angular_unit, 101.0, &geometry).unwrap(), 91);
        assert_eq!(max_angular_index(group.angular_unit, 141.0, &geometry).unwrap(), 92);

        let mut sink = VecSink::new();
        let heliostats = place(std::slice::from_ref(&group), &geometry, &mut sink).unwrap();
        assert!(sink.as_slice().iter().any(|e| matches!(
            e,
            LayoutEvent::GroupPlaced { max_index: 92, .. }
        )));
        let widest = heliostats
            .iter()
            .map(|h| h.azimuth.abs())
            .fold(0.0, f64::max);
        assert!((widest - 92.0 * group.angular_unit).abs() < 1e-12);
    }

    #[test]
    fn max_index_rejects_too_narrow_extent() {
        let config = FieldConfig::default().with_psi_max(0.01);
        let geometry = geometry(&config);
        let err = max_angular_index(geometry.angular_unit(60.0), 60.0, &geometry).unwrap_err();
        assert!(matches!(err, NumericIssue::AngularExtentTooSmall { .. }));
    }

    #[test]
    fn essential_and_staggered_slots() {
        let geometry = geometry(&FieldConfig::default());
        let group = two_ring_group(&geometry);
        let heliostats = place(std::slice::from_ref(&group), &geometry, &mut ()).unwrap();

        let essential: Vec<_> = heliostats.iter().filter(|h| h.ring == 0).collect();
        let staggered: Vec<_> = heliostats.iter().filter(|h| h.ring == 1).collect();
        // slots 0..=54 even: 28 slots, 27 mirrored
        assert_eq!(essential.len(), 55);
        // slots 1..=53 odd: 27 slots, all mirrored
        assert_eq!(staggered.len(), 54);

        assert_eq!(essential[0].azimuth, 0.0);
        assert!((essential[0].position.y - 60.0).abs() < 1e-12);
        assert!((staggered[0].azimuth - group.angular_unit).abs() < 1e-15);
        assert!((staggered[1].azimuth + group.angular_unit).abs() < 1e-15);
    }

    #[test]
    fn mirrored_pairs_are_adjacent_and_exact() {
        let geometry = geometry(&FieldConfig::default().with_slope(0.05));
        let group = two_ring_group(&geometry);
        let heliostats = place(std::slice::from_ref(&group), &geometry, &mut ()).unwrap();

        let mut i = 0;
        while i < heliostats.len() {
            let h = &heliostats[i];
            if h.azimuth == 0.0 {
                i += 1;
                continue;
            }
            let m = &heliostats[i + 1];
            assert_eq!(m.position.x, -h.position.x);
            assert_eq!(m.position.y, h.position.y);
            assert_eq!(m.position.z, h.position.z);
            assert_eq!(m.azimuth, -h.azimuth);
            assert_eq!(m.ring, h.ring);
            i += 2;
        }
    }

    #[test]
    fn ids_are_sequential_and_heights_follow_slope() {
        let config = FieldConfig::default().with_slope(0.1);
        let geometry = geometry(&config);
        let group = two_ring_group(&geometry);
        let heliostats = place(std::slice::from_ref(&group), &geometry, &mut ()).unwrap();
        for (i, h) in heliostats.iter().enumerate() {
            assert_eq!(h.id, i + 1);
            let radius = if h.ring == 0 { 60.0 } else { 66.0 };
            assert!((h.position.z - (7.3 + radius * 0.1_f64.tan())).abs() < 1e-12);
            assert!((h.position.truncate().length() - radius).abs() < 1e-9);
        }
    }

    #[test]
    fn narrow_extent_warns_about_empty_staggered_rings() {
        // One unit of extent plus a sliver of clearance: only the axis slot fits.
        let config = FieldConfig::default().with_psi_max(0.06);
        let geometry = geometry(&config);
        let group = two_ring_group(&geometry);
        let mut sink = VecSink::new();
        let heliostats = place(std::slice::from_ref(&group), &geometry, &mut sink).unwrap();
        assert_eq!(heliostats.len(), 1);
        let events = sink.into_inner();
        assert!(events
            .iter()
            .any(|e| matches!(e, LayoutEvent::Warning { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            LayoutEvent::GroupPlaced {
                heliostats: 1,
                max_index: 0,
                ..
            }
        )));
    }
}
