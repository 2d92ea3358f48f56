//! Stochastic oscillator.
//!
//! %K = 100 × (close - lowest low) / (highest high - lowest low) over the
//! trailing `k_period` bars; undefined on a zero range. %D = `d_period`-bar
//! mean of %K, undefined while any %K in its window is.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::Series;

#[derive(Debug, Clone)]
pub struct StochasticSeries {
    pub k: Series,
    pub d: Series,
}

pub fn stochastic(bars: &[OhlcvBar], k_period: usize, d_period: usize) -> StochasticSeries {
    if k_period == 0 || d_period == 0 {
        return StochasticSeries {
            k: Series::undefined(bars.len()),
            d: Series::undefined(bars.len()),
        };
    }

    let mut k_values: Vec<Option<f64>> = Vec::with_capacity(bars.len());
    for i in 0..bars.len() {
        if i + 1 < k_period {
            k_values.push(None);
            continue;
        }
        let window = &bars[i + 1 - k_period..=i];
        let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let range = highest - lowest;
        if range == 0.0 {
            k_values.push(None);
        } else {
            k_values.push(Some(100.0 * (bars[i].close - lowest) / range));
        }
    }

    let mut d_values: Vec<Option<f64>> = Vec::with_capacity(bars.len());
    for i in 0..bars.len() {
        if i + 1 < d_period {
            d_values.push(None);
            continue;
        }
        let window = &k_values[i + 1 - d_period..=i];
        if window.iter().all(|v| v.is_some()) {
            let sum: f64 = window.iter().flatten().sum();
            d_values.push(Some(sum / d_period as f64));
        } else {
            d_values.push(None);
        }
    }

    StochasticSeries {
        k: Series::new(k_values),
        d: Series::new(d_values),
    }
}
