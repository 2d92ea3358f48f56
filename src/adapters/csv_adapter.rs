//! CSV file data adapter.
//!
//! Reads `<base>/<SYMBOL>.csv` with a `timestamp,open,high,low,close,volume`
//! header, timestamps as `YYYY-MM-DD`. Bars are sorted ascending and trimmed
//! to the requested lookback window.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::error::PapertraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        lookback_days: usize,
    ) -> Result<Vec<OhlcvBar>, PapertraderError> {
        let path = self.csv_path(symbol);
        let mut reader =
            csv::Reader::from_path(&path).map_err(|e| PapertraderError::DataFetch {
                symbol: symbol.to_string(),
                reason: format!("failed to open {}: {e}", path.display()),
            })?;

        let mut bars: Vec<OhlcvBar> = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| PapertraderError::DataFetch {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {e}"),
            })?;
            let date =
                NaiveDate::parse_from_str(&row.timestamp, "%Y-%m-%d").map_err(|e| {
                    PapertraderError::DataFetch {
                        symbol: symbol.to_string(),
                        reason: format!("invalid timestamp {:?}: {e}", row.timestamp),
                    }
                })?;
            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        if bars.is_empty() {
            return Err(PapertraderError::NoData {
                symbol: symbol.to_string(),
            });
        }

        bars.sort_by_key(|b| b.date);
        if bars.len() > lookback_days {
            bars.drain(..bars.len() - lookback_days);
        }

        log::info!("loaded {} bars for {symbol} from {}", bars.len(), path.display());
        Ok(bars)
    }
}
