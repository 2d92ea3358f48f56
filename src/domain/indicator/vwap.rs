//! Rolling Volume-Weighted Average Price.
//!
//! VWAP[i] = Σ(typical price × volume) / Σ volume over the trailing `window`
//! bars, typical price = (H+L+C)/3. This is a rolling window, not a
//! session-reset VWAP. A window with zero total volume is undefined.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::Series;

pub fn rolling_vwap(bars: &[OhlcvBar], window: usize) -> Series {
    if window == 0 {
        return Series::undefined(bars.len());
    }

    let mut out: Vec<Option<f64>> = Vec::with_capacity(bars.len());
    let mut pv_sum = 0.0;
    let mut volume_sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        pv_sum += bar.typical_price() * bar.volume as f64;
        volume_sum += bar.volume as f64;
        if i >= window {
            let old = &bars[i - window];
            pv_sum -= old.typical_price() * old.volume as f64;
            volume_sum -= old.volume as f64;
        }

        if i + 1 >= window && volume_sum > 0.0 {
            out.push(Some(pv_sum / volume_sum));
        } else {
            out.push(None);
        }
    }

    Series::new(out)
}
