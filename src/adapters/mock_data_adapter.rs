//! Seeded synthetic bar generator.
//!
//! Produces a reproducible daily series ending today: a gentle linear uptrend
//! around a 20,000 base with normally-distributed noise, highs/lows within 2%
//! of the close, and uniform volume. Useful for demos and for running the
//! pipeline without a data directory.

use chrono::{Days, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::domain::error::PapertraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

const BASE_PRICE: f64 = 20_000.0;
const TREND_TOTAL: f64 = 2_000.0;
const NOISE_STD: f64 = 500.0;
const PRICE_FLOOR: f64 = 1_000.0;

pub struct MockDataAdapter {
    seed: u64,
}

impl MockDataAdapter {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for MockDataAdapter {
    fn default() -> Self {
        Self::new(42)
    }
}

impl DataPort for MockDataAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        lookback_days: usize,
    ) -> Result<Vec<OhlcvBar>, PapertraderError> {
        if lookback_days == 0 {
            return Err(PapertraderError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let noise = Normal::new(0.0, NOISE_STD).expect("valid distribution parameters");

        let end = Utc::now().date_naive();
        let start = end
            .checked_sub_days(Days::new(lookback_days as u64 - 1))
            .ok_or_else(|| PapertraderError::DataFetch {
                symbol: symbol.to_string(),
                reason: format!("lookback of {lookback_days} days underflows the calendar"),
            })?;

        let mut bars = Vec::with_capacity(lookback_days);
        for i in 0..lookback_days {
            let date = start
                .checked_add_days(Days::new(i as u64))
                .ok_or_else(|| PapertraderError::DataFetch {
                    symbol: symbol.to_string(),
                    reason: "date overflow while generating bars".into(),
                })?;

            let trend = if lookback_days > 1 {
                TREND_TOTAL * i as f64 / (lookback_days - 1) as f64
            } else {
                0.0
            };
            let close = (BASE_PRICE + trend + noise.sample(&mut rng)).max(PRICE_FLOOR);
            let high = close * (1.0 + rng.gen_range(0.0..0.02));
            let low = close * (1.0 - rng.gen_range(0.0..0.02));
            let open = low + (high - low) * rng.gen_range(0.3..0.7);

            bars.push(OhlcvBar {
                symbol: symbol.to_string(),
                date,
                open: round_price(open),
                high: round_price(high),
                low: round_price(low),
                close: round_price(close),
                volume: rng.gen_range(1_000_000..10_000_000),
            });
        }

        log::info!("generated {} mock bars for {symbol}", bars.len());
        Ok(bars)
    }
}

fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
