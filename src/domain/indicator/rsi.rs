//! RSI (Relative Strength Index).
//!
//! Average gain/loss are rolling means over the trailing `period` one-bar
//! changes. RS = avg_gain / max(avg_loss, 1e-10): a zero-loss window saturates
//! the oscillator near 100 instead of dividing by zero.
//!
//! Formula: RSI = 100 - (100 / (1 + RS)).
//! Warmup: first `period` elements are undefined (a window of `period` changes
//! needs `period + 1` closes).

use crate::domain::series::Series;

const ZERO_LOSS_GUARD: f64 = 1e-10;

pub fn rsi(closes: &[f64], period: usize) -> Series {
    let len = closes.len();
    if period == 0 || len < period + 1 {
        return Series::undefined(len);
    }

    let mut gains: Vec<f64> = Vec::with_capacity(len.saturating_sub(1));
    let mut losses: Vec<f64> = Vec::with_capacity(len.saturating_sub(1));
    for i in 1..len {
        let change = closes[i] - closes[i - 1];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut out: Vec<Option<f64>> = vec![None; period];
    let mut gain_sum: f64 = gains[..period].iter().sum();
    let mut loss_sum: f64 = losses[..period].iter().sum();

    for i in period..len {
        // change index i-1 is the newest in the window ending at bar i
        if i > period {
            gain_sum += gains[i - 1] - gains[i - 1 - period];
            loss_sum += losses[i - 1] - losses[i - 1 - period];
        }
        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;
        let rs = avg_gain / avg_loss.max(ZERO_LOSS_GUARD);
        out.push(Some(100.0 - (100.0 / (1.0 + rs))));
    }

    Series::new(out)
}
