//! Ring-and-group radial growth layout for heliostat fields.
//!
//! A layout is built in two phases: [`growth`] decides how many rings each group holds
//! and at which radii, [`placement`] turns the frozen groups into heliostat positions.
//! [`runner`] composes both behind [`runner::generate_layout`].
use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod events;
pub mod growth;
pub mod placement;
pub mod runner;
pub mod solver;

/// Angular pattern of a ring, decided by the parity of its index inside its group.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingKind {
    /// Even index: heliostats at even multiples of the angular unit, one on the axis.
    Essential,
    /// Odd index: heliostats at odd multiples of the angular unit.
    Staggered,
}

impl RingKind {
    /// Kind of the ring at `index` within its group.
    #[inline]
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            RingKind::Essential
        } else {
            RingKind::Staggered
        }
    }
}

/// A finalized ring inside a [`Group`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ring {
    /// Distance from the tower.
    pub radius: f64,
    /// Angular pattern of the ring.
    pub kind: RingKind,
}

/// A contiguous run of rings sharing one angular unit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// Minimum angular separation between adjacent heliostat slots, in radians.
    pub angular_unit: f64,
    /// Rings ordered by increasing radius.
    pub rings: Vec<Ring>,
}

impl Group {
    pub fn new(angular_unit: f64, first_radius: f64) -> Self {
        Self {
            angular_unit,
            rings: vec![Ring {
                radius: first_radius,
                kind: RingKind::Essential,
            }],
        }
    }

    /// Appends a ring at `radius`; its kind follows from the new index.
    pub fn push_ring(&mut self, radius: f64) {
        let kind = RingKind::for_index(self.rings.len());
        self.rings.push(Ring { radius, kind });
    }

    pub fn first_radius(&self) -> Option<f64> {
        self.rings.first().map(|r| r.radius)
    }

    pub fn last_radius(&self) -> Option<f64> {
        self.rings.last().map(|r| r.radius)
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

/// A placed heliostat.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Heliostat {
    /// 1-based sequential id in emission order.
    pub id: usize,
    /// Field-local position; +y points away from the tower along the field axis, z is up.
    pub position: DVec3,
    /// Index of the owning group.
    pub group: usize,
    /// Index of the owning ring within its group.
    pub ring: usize,
    /// Signed angle from the +y axis toward +x, in radians.
    pub azimuth: f64,
}
