//! Numeric helpers shared by the growth and placement phases.
//!
//! Each helper is a pure function of its inputs and the [`FieldGeometry`]. Failures are
//! reported as a bare [`NumericIssue`]; callers attach stage and ring context.
use crate::config::FieldGeometry;
use crate::error::NumericIssue;
use crate::layout::RingKind;

/// Radius of the ring that packs against a ring at `radius` in a group with
/// `angular_unit`.
///
/// Places the new ring so that the distance between a heliostat on the previous ring and
/// its staggered neighbour on the new ring equals the slope-adjusted characteristic
/// diameter.
pub fn next_ring_radius(
    radius: f64,
    angular_unit: f64,
    geometry: &FieldGeometry,
) -> Result<f64, NumericIssue> {
    let reach = geometry.characteristic_diameter * geometry.cos_slope;
    let offset = radius * angular_unit.sin();
    let discriminant = reach * reach - offset * offset;
    if discriminant < 0.0 {
        return Err(NumericIssue::NegativeDiscriminant {
            value: discriminant,
        });
    }

    let next = radius * angular_unit.cos() + discriminant.sqrt();
    if !next.is_finite() {
        return Err(NumericIssue::NonFinite);
    }
    if next <= radius {
        return Err(NumericIssue::NonIncreasingRadius {
            previous: radius,
            next,
        });
    }
    Ok(next)
}

/// Farthest radius beyond a ring at `radius` from which a heliostat still sees the
/// receiver aperture over the heliostats of that ring.
///
/// Solves two quadratics in sequence: the first yields the slope of the tangent from
/// the receiver bottom to the heliostat circle at `radius`, the second intersects that
/// line with the heliostat circle on the sloped terrain further out.
pub fn view_limited_radius(radius: f64, geometry: &FieldGeometry) -> Result<f64, NumericIssue> {
    let z0 = geometry.center_height;
    let z1 = geometry.receiver_bottom;
    let rm = geometry.circle_radius;
    let tan_b = geometry.tan_slope;
    let zm = geometry.height_at(radius);

    let a = z1 * z1 * (rm * rm - radius * radius);
    let b = 2.0 * radius * z1 * (z1 - zm);
    let c = rm * rm - (zm - z1) * (zm - z1);
    let tangent = quadratic_root(a, b, c, Root::Plus)?;

    let qa = -((2.0 * z1 * tangent + tan_b) * tan_b + z1 * z1 * tangent * tangent);
    let qb = 2.0 * (z1 - z0) * (z1 * tangent + tan_b);
    let qc = rm * rm * (1.0 + z1 * z1 * tangent * tangent) - (z1 - z0) * (z1 - z0);
    quadratic_root(qa, qb, qc, Root::Minus)
}

/// Conservative radius for a ring following `current`: the view-limited radius of
/// `reference`, but never closer than the minimum ring separation.
pub fn candidate_radius(
    reference: f64,
    current: f64,
    geometry: &FieldGeometry,
) -> Result<f64, NumericIssue> {
    let view_limited = view_limited_radius(reference, geometry)?;
    Ok(view_limited.max(current + geometry.min_ring_separation))
}

/// Number of heliostats a ring of `kind` holds with `angular_unit` inside the angular
/// half-extent `psi_max`.
pub fn heliostats_in_ring(kind: RingKind, angular_unit: f64, psi_max: f64) -> usize {
    let count = match kind {
        RingKind::Essential => 2.0 * (psi_max * 0.5 / angular_unit).trunc() + 1.0,
        RingKind::Staggered => 2.0 * ((psi_max - angular_unit) * 0.5 / angular_unit).trunc() + 2.0,
    };
    count as usize
}

/// How the annular land area behind a density estimate is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaEstimate {
    /// The squared-radius difference is used as is.
    Exact,
    /// The squared-radius difference is truncated to whole square meters. Used for the
    /// ring that would extend the current group.
    Truncated,
}

/// Ratio of net reflective area of `count` heliostats to the annular land area between
/// rings at `inner` and `outer`, both offset outward by half a characteristic diameter.
pub fn mirror_density(
    count: usize,
    inner: f64,
    outer: f64,
    estimate: AreaEstimate,
    geometry: &FieldGeometry,
) -> Result<f64, NumericIssue> {
    let half = 0.5 * geometry.characteristic_diameter;
    let outer_edge = outer + half;
    let inner_edge = inner + half;
    let annulus = outer_edge * outer_edge - inner_edge * inner_edge;
    let annulus = match estimate {
        AreaEstimate::Exact => annulus,
        AreaEstimate::Truncated => annulus.trunc(),
    };
    let area = geometry.psi_max * annulus;
    if !(area > 0.0) {
        return Err(NumericIssue::NonPositiveArea { area });
    }
    Ok(count as f64 * geometry.net_area / area)
}

#[derive(Clone, Copy)]
enum Root {
    Plus,
    Minus,
}

fn quadratic_root(a: f64, b: f64, c: f64, root: Root) -> Result<f64, NumericIssue> {
    if a == 0.0 {
        return Err(NumericIssue::DegenerateQuadratic);
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Err(NumericIssue::NegativeDiscriminant {
            value: discriminant,
        });
    }
    let sqrt = discriminant.sqrt();
    let value = match root {
        Root::Plus => (-b + sqrt) / (2.0 * a),
        Root::Minus => (-b - sqrt) / (2.0 * a),
    };
    if !value.is_finite() {
        return Err(NumericIssue::NonFinite);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::config::FieldConfig;

    fn reference() -> FieldGeometry {
        FieldGeometry::from_config(&FieldConfig::default())
    }

    fn sloped(slope: f64) -> FieldGeometry {
        FieldGeometry::from_config(&FieldConfig::default().with_slope(slope))
    }

    #[test]
    fn next_ring_radius_matches_hand_computed_reference() {
        let geometry = reference();
        let unit = geometry.angular_unit(60.0);
        let next = next_ring_radius(60.0, unit, &geometry).unwrap();
        assert!((next - 65.817_540_354_441_83).abs() < 1e-9, "{next}");
    }

    #[test]
    fn next_ring_radius_shrinks_on_slope() {
        let geometry = sloped(0.1);
        let unit = geometry.angular_unit(60.0);
        let next = next_ring_radius(60.0, unit, &geometry).unwrap();
        assert!((next - 65.778_123_370_360_63).abs() < 1e-9, "{next}");
    }

    #[test]
    fn next_ring_radius_rejects_inconsistent_unit() {
        let geometry = reference();
        // sin(unit) * radius far beyond the characteristic diameter
        let err = next_ring_radius(60.0, 0.5, &geometry).unwrap_err();
        assert!(matches!(err, NumericIssue::NegativeDiscriminant { value } if value < 0.0));
    }

    #[test]
    fn view_limited_radius_matches_hand_computed_reference() {
        let vl = view_limited_radius(60.0, &reference()).unwrap();
        assert!((vl - 64.009_897_063_196_32).abs() < 1e-6, "{vl}");
    }

    #[test]
    fn view_limited_radius_on_slopes() {
        let up = view_limited_radius(100.0, &sloped(0.05)).unwrap();
        assert!((up - 105.374_198_277_940_34).abs() < 1e-6, "{up}");
        let down = view_limited_radius(100.0, &sloped(-0.05)).unwrap();
        assert!((down - 105.621_588_647_138_94).abs() < 1e-6, "{down}");
    }

    #[test]
    fn view_limited_radius_rejects_degenerate_quadratic() {
        let mut geometry = reference();
        // a = z1^2 (rm^2 - r^2) vanishes at r = rm
        let err = view_limited_radius(geometry.circle_radius, &geometry).unwrap_err();
        assert_eq!(err, NumericIssue::DegenerateQuadratic);

        geometry.receiver_bottom = 0.0;
        let err = view_limited_radius(60.0, &geometry).unwrap_err();
        assert_eq!(err, NumericIssue::DegenerateQuadratic);
    }

    #[test]
    fn candidate_radius_never_closer_than_min_separation() {
        let geometry = reference();
        let candidate = candidate_radius(60.0, 65.0, &geometry).unwrap();
        assert!((candidate - (65.0 + geometry.min_ring_separation)).abs() < 1e-12);

        let candidate = candidate_radius(60.0, 50.0, &geometry).unwrap();
        assert!((candidate - 64.009_897_063_196_32).abs() < 1e-6);
    }

    #[test]
    fn ring_counts_follow_parity() {
        let unit = reference().angular_unit(60.0);
        assert_eq!(heliostats_in_ring(RingKind::Essential, unit, PI), 55);
        assert_eq!(heliostats_in_ring(RingKind::Staggered, unit, PI), 56);
        assert_eq!(heliostats_in_ring(RingKind::Staggered, 1.0, 0.5), 2);
        assert_eq!(heliostats_in_ring(RingKind::Essential, 1.0, 0.5), 1);
    }

    #[test]
    fn mirror_density_matches_hand_computed_reference() {
        let geometry = reference();
        let density = mirror_density(3, 60.0, 70.0, AreaEstimate::Exact, &geometry).unwrap();
        assert!((density - 0.005_583_223_770_778_361).abs() < 1e-12, "{density}");
    }

    #[test]
    fn truncated_estimate_drops_fractional_square_meters() {
        let geometry = reference();
        // (70 + DM/2)^2 - (60 + DM/2)^2 = 1368.284..., truncated to 1368
        let density =
            mirror_density(3, 60.0, 70.0, AreaEstimate::Truncated, &geometry).unwrap();
        assert!((density - 0.005_584_383_968_136_678_5).abs() < 1e-12, "{density}");
        assert_eq!(density, 3.0 * geometry.net_area / (PI * 1368.0));
    }

    #[test]
    fn mirror_density_rejects_empty_annulus() {
        let geometry = reference();
        let err = mirror_density(3, 70.0, 70.0, AreaEstimate::Exact, &geometry).unwrap_err();
        assert!(matches!(err, NumericIssue::NonPositiveArea { .. }));

        // Less than one square meter of annulus truncates to nothing.
        let err =
            mirror_density(3, 60.0, 60.005, AreaEstimate::Truncated, &geometry).unwrap_err();
        assert_eq!(err, NumericIssue::NonPositiveArea { area: 0.0 });
        assert!(mirror_density(3, 60.0, 60.005, AreaEstimate::Exact, &geometry).is_ok());
    }
}
