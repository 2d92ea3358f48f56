//! Technical indicator catalogue.
//!
//! Individual indicators are pure functions from bar history to a [`Series`].
//! [`IndicatorSet`] bundles computed series under their published column
//! names — the names custom conditions use to address them. Unknown names
//! resolve to nothing, which the condition evaluator degrades to all-false.

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod vwap;
pub mod macd;
pub mod bollinger;
pub mod stochastic;
pub mod atr;
pub mod roc;
pub mod stddev;
pub mod volume;

use std::collections::BTreeMap;

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::Series;

/// Published column names.
pub mod columns {
    pub const SMA_20: &str = "SMA_20";
    pub const SMA_50: &str = "SMA_50";
    pub const SMA_100: &str = "SMA_100";
    pub const SMA_200: &str = "SMA_200";
    pub const EMA_9: &str = "EMA_9";
    pub const EMA_20: &str = "EMA_20";
    pub const EMA_50: &str = "EMA_50";
    pub const EMA_100: &str = "EMA_100";
    pub const EMA_200: &str = "EMA_200";
    pub const RSI: &str = "RSI";
    pub const VWAP: &str = "VWAP";
    pub const MACD: &str = "MACD";
    pub const MACD_SIGNAL: &str = "MACD_Signal";
    pub const MACD_HISTOGRAM: &str = "MACD_Histogram";
    pub const BB_MIDDLE: &str = "BB_Middle";
    pub const BB_UPPER: &str = "BB_Upper";
    pub const BB_LOWER: &str = "BB_Lower";
    pub const BB_WIDTH: &str = "BB_Width";
    pub const BB_POSITION: &str = "BB_Position";
    pub const STOCH_K: &str = "Stoch_K";
    pub const STOCH_D: &str = "Stoch_D";
    pub const ATR: &str = "ATR";
    pub const VOLUME_SMA: &str = "Volume_SMA";
    pub const VOLUME_RATIO: &str = "Volume_Ratio";
    pub const PRICE_CHANGE: &str = "Price_Change";
    pub const PRICE_CHANGE_5: &str = "Price_Change_5";
    pub const PRICE_CHANGE_10: &str = "Price_Change_10";
    pub const PRICE: &str = "price";
    pub const OPEN_PRICE: &str = "open_price";
    pub const HIGH_PRICE: &str = "high_price";
    pub const LOW_PRICE: &str = "low_price";
}

pub const RSI_PERIOD: usize = 14;
pub const VWAP_WINDOW: usize = 20;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;
pub const BB_PERIOD: usize = 20;
pub const BB_MULT: f64 = 2.0;
pub const STOCH_K_PERIOD: usize = 14;
pub const STOCH_D_PERIOD: usize = 3;
pub const ATR_PERIOD: usize = 14;
pub const VOLUME_WINDOW: usize = 20;

/// Named indicator series, all aligned 1:1 with the bar sequence.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    len: usize,
    columns: BTreeMap<String, Series>,
}

impl IndicatorSet {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            columns: BTreeMap::new(),
        }
    }

    /// Number of bars every column is aligned with.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, name: &str, series: Series) {
        debug_assert_eq!(series.len(), self.len, "misaligned column {name}");
        self.columns.insert(name.to_string(), series);
    }

    /// Column lookup by published name; `None` for unknown names.
    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> &BTreeMap<String, Series> {
        &self.columns
    }
}

/// Compute the full catalogue available to custom strategies.
pub fn compute_all(bars: &[OhlcvBar]) -> IndicatorSet {
    use columns::*;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let opens: Vec<f64> = bars.iter().map(|b| b.open).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

    let mut set = IndicatorSet::new(bars.len());

    for (name, period) in [(SMA_20, 20), (SMA_50, 50), (SMA_100, 100), (SMA_200, 200)] {
        set.insert(name, sma::sma(&closes, period));
    }
    for (name, span) in [
        (EMA_9, 9),
        (EMA_20, 20),
        (EMA_50, 50),
        (EMA_100, 100),
        (EMA_200, 200),
    ] {
        set.insert(name, ema::ema(&closes, span));
    }

    set.insert(RSI, rsi::rsi(&closes, RSI_PERIOD));
    set.insert(VWAP, vwap::rolling_vwap(bars, VWAP_WINDOW));

    let macd = macd::macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL_SPAN);
    set.insert(MACD, macd.line);
    set.insert(MACD_SIGNAL, macd.signal);
    set.insert(MACD_HISTOGRAM, macd.histogram);

    let bands = bollinger::bollinger(&closes, BB_PERIOD, BB_MULT);
    set.insert(BB_MIDDLE, bands.middle);
    set.insert(BB_UPPER, bands.upper);
    set.insert(BB_LOWER, bands.lower);
    set.insert(BB_WIDTH, bands.width);
    set.insert(BB_POSITION, bands.position);

    let stoch = stochastic::stochastic(bars, STOCH_K_PERIOD, STOCH_D_PERIOD);
    set.insert(STOCH_K, stoch.k);
    set.insert(STOCH_D, stoch.d);

    set.insert(ATR, atr::atr(bars, ATR_PERIOD));

    let vol_sma = volume::volume_sma(&volumes, VOLUME_WINDOW);
    set.insert(VOLUME_RATIO, volume::volume_ratio(&volumes, &vol_sma));
    set.insert(VOLUME_SMA, vol_sma);

    let close_series = Series::from_values(&closes);
    set.insert(PRICE_CHANGE, roc::roc(&close_series, 1));
    set.insert(PRICE_CHANGE_5, roc::roc(&close_series, 5));
    set.insert(PRICE_CHANGE_10, roc::roc(&close_series, 10));

    set.insert(PRICE, close_series);
    set.insert(OPEN_PRICE, Series::from_values(&opens));
    set.insert(HIGH_PRICE, Series::from_values(&highs));
    set.insert(LOW_PRICE, Series::from_values(&lows));

    set
}
