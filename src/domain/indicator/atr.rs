//! Average True Range.
//!
//! Rolling `period`-bar mean of the true range. The first bar has no prior
//! close, so its true range is high - low.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::Series;

pub fn atr(bars: &[OhlcvBar], period: usize) -> Series {
    if period == 0 {
        return Series::undefined(bars.len());
    }

    let mut tr_values: Vec<f64> = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            bar.high - bar.low
        } else {
            bar.true_range(bars[i - 1].close)
        };
        tr_values.push(tr);
    }

    crate::domain::indicator::sma::sma(&tr_values, period)
}
