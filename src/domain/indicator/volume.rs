//! Volume-derived columns.

use crate::domain::indicator::sma::sma;
use crate::domain::series::Series;

const ZERO_VOLUME_GUARD: f64 = 1e-10;

/// Rolling mean of volume.
pub fn volume_sma(volumes: &[f64], period: usize) -> Series {
    sma(volumes, period)
}

/// Current volume relative to its rolling mean. A zero mean is floored at a
/// tiny divisor rather than dividing by zero.
pub fn volume_ratio(volumes: &[f64], volume_sma: &Series) -> Series {
    let values = volumes
        .iter()
        .enumerate()
        .map(|(i, &v)| volume_sma.get(i).map(|avg| v / avg.max(ZERO_VOLUME_GUARD)))
        .collect();
    Series::new(values)
}
