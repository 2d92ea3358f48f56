//! Exponential Moving Average.
//!
//! k = 2/(span+1), seeded with the first value, then
//! EMA[i] = v[i]*k + EMA[i-1]*(1-k). No warm-up skip: the series is defined
//! from index 0.

use crate::domain::series::Series;

pub fn ema(values: &[f64], span: usize) -> Series {
    if span == 0 || values.is_empty() {
        return Series::undefined(values.len());
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut out: Vec<Option<f64>> = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(Some(prev));

    for &v in &values[1..] {
        prev = v * k + prev * (1.0 - k);
        out.push(Some(prev));
    }

    Series::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_defined_from_first_bar() {
        let series = ema(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(series.len(), 4);
        assert!(series.iter().all(|v| v.is_some()));
    }

    #[test]
    fn ema_seeded_with_first_value() {
        let series = ema(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(series.get(0).unwrap(), 10.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = ema(&[10.0, 20.0, 30.0], 3);
        let k = 2.0 / 4.0;

        let ema_1 = 20.0 * k + 10.0 * (1.0 - k);
        assert_relative_eq!(series.get(1).unwrap(), ema_1);

        let ema_2 = 30.0 * k + ema_1 * (1.0 - k);
        assert_relative_eq!(series.get(2).unwrap(), ema_2);
    }

    #[test]
    fn ema_equal_prices() {
        let series = ema(&[100.0, 100.0, 100.0, 100.0], 9);
        for i in 0..4 {
            assert_relative_eq!(series.get(i).unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_span_1_tracks_input() {
        let series = ema(&[10.0, 20.0, 30.0], 1);
        assert_relative_eq!(series.get(1).unwrap(), 20.0);
        assert_relative_eq!(series.get(2).unwrap(), 30.0);
    }

    #[test]
    fn ema_empty_and_span_0() {
        assert!(ema(&[], 3).is_empty());
        assert!(ema(&[10.0, 20.0], 0).iter().all(|v| v.is_none()));
    }
}
