//! Rolling standard deviation (sample, n-1 denominator).

use crate::domain::series::Series;

pub fn rolling_std(values: &[f64], period: usize) -> Series {
    if period < 2 {
        return Series::undefined(values.len());
    }

    let mut out: Vec<Option<f64>> = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i + 1 < period {
            out.push(None);
            continue;
        }
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / (period - 1) as f64;
        out.push(Some(variance.sqrt()));
    }

    Series::new(out)
}
