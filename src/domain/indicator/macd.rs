//! MACD (Moving Average Convergence Divergence).
//!
//! Line = EMA(fast) - EMA(slow), signal = EMA(signal_span) of the line,
//! histogram = line - signal. With first-value-seeded EMAs all three series
//! are defined from index 0.

use crate::domain::indicator::ema::ema;
use crate::domain::series::Series;

#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdSeries {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    let line = fast_ema.zip_with(&slow_ema, |f, s| f - s);

    let line_values: Vec<f64> = line.iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal = if closes.is_empty() {
        Series::undefined(0)
    } else {
        ema(&line_values, signal_span)
    };
    let histogram = line.zip_with(&signal, |l, s| l - s);

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
