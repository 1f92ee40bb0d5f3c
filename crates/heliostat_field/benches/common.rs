use std::time::Duration;

use criterion::{Criterion, Throughput};
use heliostat_field::config::FieldConfig;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

/// Outer radial bounds, as multiples of the aim height.
pub const OUTER_FACTORS: [f64; 4] = [2.0, 3.2, 5.0, 8.0];

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

pub fn config_with_outer_factor(factor: f64) -> FieldConfig {
    FieldConfig::default().with_radial_bounds_from_aim_height(0.8, factor)
}
