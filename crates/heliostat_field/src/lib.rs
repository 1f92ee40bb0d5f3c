#![forbid(unsafe_code)]
//! heliostat_field: heliostat field layouts for solar power towers.
//!
//! Modules:
//! - config: field configuration and derived geometry
//! - layout: ring-and-group radial growth (growth phase, placement phase, events, runner)
//! - output: CSV serialization of a finished layout
//!
//! For examples, see the `heliostat_field_examples` crate.
pub mod config;
pub mod error;
pub mod layout;
pub mod output;

/// Convenient re-exports for common types. Import with `use heliostat_field::prelude::*;`.
pub mod prelude {
    pub use crate::config::{FieldConfig, FieldGeometry, PACKING_ANGLE};
    pub use crate::error::{Error, NumericIssue, Result, Stage};
    pub use crate::layout::events::{
        EventSink, FnSink, LayoutEvent, LayoutEventKind, MultiSink, VecSink,
    };
    pub use crate::layout::growth::{grow, ring_budget, Growth};
    pub use crate::layout::placement::{max_angular_index, place};
    pub use crate::layout::runner::{
        generate_layout, generate_layout_with_events, FieldLayout, LayoutRunner, LayoutSummary,
    };
    pub use crate::layout::{Group, Heliostat, Ring, RingKind};
    pub use crate::output::{to_csv_string, write_csv, write_csv_to_path};
}
