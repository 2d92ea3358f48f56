//! Simple Moving Average.
//!
//! Rolling mean over the trailing `period` values. Warmup: first (period-1)
//! elements are undefined.

use crate::domain::series::Series;

pub fn sma(values: &[f64], period: usize) -> Series {
    if period == 0 {
        return Series::undefined(values.len());
    }

    let mut out: Vec<Option<f64>> = Vec::with_capacity(values.len());
    let mut window_sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        window_sum += v;
        if i >= period {
            window_sum -= values[i - period];
        }
        if i + 1 >= period {
            out.push(Some(window_sum / period as f64));
        } else {
            out.push(None);
        }
    }

    Series::new(out)
}
