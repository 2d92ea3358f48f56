//! Percent change over an n-bar lookback.
//!
//! roc[i] = (v[i] / v[i-period] - 1) × 100. Undefined while the lookback is
//! out of range, while either endpoint is undefined, or on a zero base value.

use crate::domain::series::Series;

pub fn roc(series: &Series, period: usize) -> Series {
    let len = series.len();
    if period == 0 {
        return Series::undefined(len);
    }

    let mut out: Vec<Option<f64>> = Vec::with_capacity(len);
    for i in 0..len {
        if i < period {
            out.push(None);
            continue;
        }
        match (series.get(i), series.get(i - period)) {
            (Some(current), Some(base)) if base != 0.0 => {
                out.push(Some((current / base - 1.0) * 100.0));
            }
            _ => out.push(None),
        }
    }

    Series::new(out)
}
