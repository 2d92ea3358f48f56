#![allow(dead_code)]

use chrono::NaiveDate;
use papertrader::domain::error::PapertraderError;
use papertrader::domain::ohlcv::OhlcvBar;
use papertrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub fn close_bars(symbol: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .checked_add_days(chrono::Days::new(i as u64))
                .unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        })
        .collect()
}

pub fn trending_closes(len: usize, start: f64, step: f64) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}

pub struct InMemoryDataPort {
    data: HashMap<String, Vec<OhlcvBar>>,
}

impl InMemoryDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }
}

impl DataPort for InMemoryDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        lookback_days: usize,
    ) -> Result<Vec<OhlcvBar>, PapertraderError> {
        let bars = self
            .data
            .get(symbol)
            .filter(|bars| !bars.is_empty())
            .ok_or_else(|| PapertraderError::NoData {
                symbol: symbol.to_string(),
            })?;

        let start = bars.len().saturating_sub(lookback_days);
        Ok(bars[start..].to_vec())
    }
}
