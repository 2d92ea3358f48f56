//! Bollinger Bands.
//!
//! Middle = SMA(period), upper/lower = middle ± mult × rolling sample stddev.
//! Derived fields: width = (upper - lower) / middle, position =
//! (close - lower) / (upper - lower). Width is undefined on a zero middle,
//! position on a zero-width band.

use crate::domain::indicator::{sma::sma, stddev::rolling_std};
use crate::domain::series::Series;

#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub middle: Series,
    pub upper: Series,
    pub lower: Series,
    pub width: Series,
    pub position: Series,
}

pub fn bollinger(closes: &[f64], period: usize, mult: f64) -> BollingerSeries {
    let middle = sma(closes, period);
    let std = rolling_std(closes, period);

    let upper = middle.zip_with(&std, |m, s| m + mult * s);
    let lower = middle.zip_with(&std, |m, s| m - mult * s);

    let mut width_values: Vec<Option<f64>> = Vec::with_capacity(closes.len());
    let mut position_values: Vec<Option<f64>> = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        let band = match (upper.get(i), lower.get(i), middle.get(i)) {
            (Some(u), Some(l), Some(m)) => Some((u, l, m)),
            _ => None,
        };
        match band {
            Some((u, l, m)) if m != 0.0 => width_values.push(Some((u - l) / m)),
            _ => width_values.push(None),
        }
        match band {
            Some((u, l, _)) if u - l != 0.0 => {
                position_values.push(Some((closes[i] - l) / (u - l)))
            }
            _ => position_values.push(None),
        }
    }

    BollingerSeries {
        middle,
        upper,
        lower,
        width: Series::new(width_values),
        position: Series::new(position_values),
    }
}
