//! Signal generation for the fixed strategies, and the position deriver.
//!
//! Each strategy pairs an indicator computation with a signal function over
//! the resulting columns. Signals are decided on a bar's close; the position
//! deriver shifts them one bar so the backtest acts on the following bar.
//!
//! Tie-break: within one bar a Buy always wins. Buy conditions are applied
//! first; Sell only fills bars still on Hold. An undefined indicator value
//! satisfies no condition.

use crate::domain::indicator::{self, columns, IndicatorSet};
use crate::domain::ohlcv::OhlcvBar;

/// Per-bar trading instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }
}

/// RSI level below which the oversold strategy buys.
pub const RSI_BUY_THRESHOLD: f64 = 20.0;

/// Pullback tolerance around VWAP/EMA support, as a fraction of the level.
const PULLBACK_TOLERANCE: f64 = 0.005;

pub fn sma_crossover_indicators(bars: &[OhlcvBar]) -> IndicatorSet {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let mut set = IndicatorSet::new(bars.len());
    set.insert(columns::SMA_20, indicator::sma::sma(&closes, 20));
    set.insert(columns::SMA_50, indicator::sma::sma(&closes, 50));
    set
}

/// Buy while the fast average is above the slow one, sell while below.
/// Equality or an unfilled window holds.
pub fn sma_crossover_signals(bars: &[OhlcvBar], set: &IndicatorSet) -> Vec<Signal> {
    let fast = set.column(columns::SMA_20);
    let slow = set.column(columns::SMA_50);

    (0..bars.len())
        .map(|i| {
            match (fast.and_then(|s| s.get(i)), slow.and_then(|s| s.get(i))) {
                (Some(f), Some(s)) if f > s => Signal::Buy,
                (Some(f), Some(s)) if f < s => Signal::Sell,
                _ => Signal::Hold,
            }
        })
        .collect()
}

pub fn rsi_oversold_indicators(bars: &[OhlcvBar]) -> IndicatorSet {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let mut set = IndicatorSet::new(bars.len());
    set.insert(
        columns::RSI,
        indicator::rsi::rsi(&closes, indicator::RSI_PERIOD),
    );
    set
}

/// Buy when RSI dips below the oversold threshold. This strategy never emits
/// Sell: exits come from its exit rules (take-profit or one-bar max hold) and
/// the universal stop-loss.
pub fn rsi_oversold_signals(bars: &[OhlcvBar], set: &IndicatorSet) -> Vec<Signal> {
    let rsi = set.column(columns::RSI);

    (0..bars.len())
        .map(|i| match rsi.and_then(|s| s.get(i)) {
            Some(value) if value < RSI_BUY_THRESHOLD => Signal::Buy,
            _ => Signal::Hold,
        })
        .collect()
}

pub fn vwap_indicators(bars: &[OhlcvBar]) -> IndicatorSet {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let mut set = IndicatorSet::new(bars.len());
    set.insert(
        columns::VWAP,
        indicator::vwap::rolling_vwap(bars, indicator::VWAP_WINDOW),
    );
    set.insert(columns::EMA_9, indicator::ema::ema(&closes, 9));
    set.insert(columns::EMA_20, indicator::ema::ema(&closes, 20));
    set
}

fn near_level(low: f64, level: f64) -> bool {
    low <= level * (1.0 + PULLBACK_TOLERANCE) && low >= level * (1.0 - PULLBACK_TOLERANCE)
}

/// Trade in the direction of price versus VWAP.
///
/// Buy: close above VWAP on a bullish bar whose low pulled back to within
/// 0.5% of VWAP or EMA(9). Sell: close at or below VWAP (buyers lost
/// control) on a bar not already marked Buy.
pub fn vwap_trend_rider_signals(bars: &[OhlcvBar], set: &IndicatorSet) -> Vec<Signal> {
    let vwap = set.column(columns::VWAP);
    let ema_9 = set.column(columns::EMA_9);

    (0..bars.len())
        .map(|i| {
            let bar = &bars[i];
            let Some(vwap) = vwap.and_then(|s| s.get(i)) else {
                return Signal::Hold;
            };

            let above_vwap = bar.close > vwap;
            let bullish = bar.close > bar.open;
            let pullback = near_level(bar.low, vwap)
                || ema_9
                    .and_then(|s| s.get(i))
                    .is_some_and(|e| near_level(bar.low, e));

            if above_vwap && bullish && pullback {
                Signal::Buy
            } else if !above_vwap {
                Signal::Sell
            } else {
                Signal::Hold
            }
        })
        .collect()
}

/// VWAP + EMA confluence entry filter.
///
/// Buy: close above VWAP, EMA(9) above EMA(20), the bar's low never broke
/// VWAP, and the close bounced back over EMA(9) (previous close at or below
/// the previous EMA(9)). Sell: close at or below VWAP or EMA(9) at or below
/// EMA(20), on a bar not already marked Buy.
pub fn vwap_ema_confluence_signals(bars: &[OhlcvBar], set: &IndicatorSet) -> Vec<Signal> {
    let vwap = set.column(columns::VWAP);
    let ema_9 = set.column(columns::EMA_9);
    let ema_20 = set.column(columns::EMA_20);

    (0..bars.len())
        .map(|i| {
            let bar = &bars[i];
            let vwap_i = vwap.and_then(|s| s.get(i));
            let ema_9_i = ema_9.and_then(|s| s.get(i));
            let ema_20_i = ema_20.and_then(|s| s.get(i));

            let bounce = i > 0
                && bars[i - 1].close <= ema_9.and_then(|s| s.get(i - 1)).unwrap_or(f64::MIN)
                && ema_9_i.is_some_and(|e| bar.close > e);

            let buy = vwap_i.is_some_and(|v| bar.close > v && bar.low > v)
                && matches!((ema_9_i, ema_20_i), (Some(f), Some(s)) if f > s)
                && bounce;
            if buy {
                return Signal::Buy;
            }

            let below_vwap = vwap_i.is_some_and(|v| bar.close <= v);
            let ema_bearish = matches!((ema_9_i, ema_20_i), (Some(f), Some(s)) if f <= s);
            if below_vwap || ema_bearish {
                Signal::Sell
            } else {
                Signal::Hold
            }
        })
        .collect()
}

/// Shift signals one bar forward: the system cannot act on a signal until the
/// bar after it was generated. `position[0]` is always Hold.
pub fn positions_from_signals(signals: &[Signal]) -> Vec<Signal> {
    if signals.is_empty() {
        return Vec::new();
    }
    let mut positions = Vec::with_capacity(signals.len());
    positions.push(Signal::Hold);
    positions.extend_from_slice(&signals[..signals.len() - 1]);
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: usize, open: f64, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            symbol: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .checked_add_days(chrono::Days::new(i as u64))
                .unwrap(),
            open,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    fn close_bars(closes: &[f64]) -> Vec<OhlcvBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| bar(i, c, c, c, c))
            .collect()
    }

    mod sma_crossover {
        use super::*;

        #[test]
        fn holds_while_windows_unfilled() {
            let bars = close_bars(&[100.0; 60]);
            let set = sma_crossover_indicators(&bars);
            let signals = sma_crossover_signals(&bars, &set);

            for (i, s) in signals.iter().enumerate().take(49) {
                assert_eq!(*s, Signal::Hold, "bar {i} should hold during warmup");
            }
        }

        #[test]
        fn equal_averages_hold() {
            let bars = close_bars(&[100.0; 60]);
            let set = sma_crossover_indicators(&bars);
            let signals = sma_crossover_signals(&bars, &set);

            assert_eq!(signals[59], Signal::Hold);
        }

        #[test]
        fn buys_in_uptrend_sells_in_downtrend() {
            let mut closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
            let bars = close_bars(&closes);
            let set = sma_crossover_indicators(&bars);
            let signals = sma_crossover_signals(&bars, &set);
            assert_eq!(signals[79], Signal::Buy);

            closes.reverse();
            let bars = close_bars(&closes);
            let set = sma_crossover_indicators(&bars);
            let signals = sma_crossover_signals(&bars, &set);
            assert_eq!(signals[79], Signal::Sell);
        }
    }

    mod rsi_oversold {
        use super::*;

        #[test]
        fn buys_after_heavy_losses_and_never_sells() {
            // steady decline drives RSI to 0
            let closes: Vec<f64> = (0..30).map(|i| 300.0 - (i as f64) * 5.0).collect();
            let bars = close_bars(&closes);
            let set = rsi_oversold_indicators(&bars);
            let signals = rsi_oversold_signals(&bars, &set);

            assert!(signals.contains(&Signal::Buy));
            assert!(!signals.contains(&Signal::Sell));
        }

        #[test]
        fn holds_during_warmup_and_in_neutral_markets() {
            let closes: Vec<f64> = (0..30)
                .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
                .collect();
            let bars = close_bars(&closes);
            let set = rsi_oversold_indicators(&bars);
            let signals = rsi_oversold_signals(&bars, &set);

            assert!(signals.iter().all(|s| *s == Signal::Hold));
        }
    }

    mod vwap_trend_rider {
        use super::*;

        fn warmup_bars() -> Vec<OhlcvBar> {
            // 20 flat bars fill the VWAP window at 100
            (0..20).map(|i| bar(i, 100.0, 100.0, 100.0, 100.0)).collect()
        }

        #[test]
        fn holds_while_vwap_undefined() {
            let bars: Vec<OhlcvBar> = (0..10).map(|i| bar(i, 100.0, 101.0, 90.0, 95.0)).collect();
            let set = vwap_indicators(&bars);
            let signals = vwap_trend_rider_signals(&bars, &set);

            assert!(signals.iter().all(|s| *s == Signal::Hold));
        }

        #[test]
        fn buys_bullish_pullback_above_vwap() {
            let mut bars = warmup_bars();
            // bullish bar closing above VWAP (~100), low dipping to support
            bars.push(bar(20, 100.2, 101.5, 100.0, 101.0));
            let set = vwap_indicators(&bars);
            let signals = vwap_trend_rider_signals(&bars, &set);

            assert_eq!(*signals.last().unwrap(), Signal::Buy);
        }

        #[test]
        fn sells_below_vwap() {
            let mut bars = warmup_bars();
            bars.push(bar(20, 100.0, 100.5, 95.0, 96.0));
            let set = vwap_indicators(&bars);
            let signals = vwap_trend_rider_signals(&bars, &set);

            assert_eq!(*signals.last().unwrap(), Signal::Sell);
        }

        #[test]
        fn holds_above_vwap_without_pullback() {
            let mut bars = warmup_bars();
            // closes above VWAP but the low never came near support
            bars.push(bar(20, 109.0, 112.0, 108.0, 111.0));
            let set = vwap_indicators(&bars);
            let signals = vwap_trend_rider_signals(&bars, &set);

            assert_eq!(*signals.last().unwrap(), Signal::Hold);
        }
    }

    mod vwap_ema_confluence {
        use super::*;

        #[test]
        fn buys_on_ema_bounce_in_uptrend() {
            // rising closes keep EMA9 > EMA20 and price above VWAP
            let mut bars: Vec<OhlcvBar> = (0..25)
                .map(|i| {
                    let c = 100.0 + i as f64;
                    bar(i, c - 0.5, c + 0.5, c - 0.6, c)
                })
                .collect();
            // dip under EMA9, then bounce over it without breaking VWAP
            let dip = 118.0;
            bars.push(bar(25, dip, dip + 0.5, dip - 0.5, dip));
            bars.push(bar(26, 124.0, 127.0, 123.0, 126.5));

            let set = vwap_indicators(&bars);
            let signals = vwap_ema_confluence_signals(&bars, &set);

            assert_eq!(*signals.last().unwrap(), Signal::Buy);
        }

        #[test]
        fn sells_when_trend_filter_fails() {
            // falling closes: EMA9 below EMA20
            let bars: Vec<OhlcvBar> = (0..25)
                .map(|i| {
                    let c = 200.0 - (i as f64) * 2.0;
                    bar(i, c + 1.0, c + 2.0, c - 1.0, c)
                })
                .collect();
            let set = vwap_indicators(&bars);
            let signals = vwap_ema_confluence_signals(&bars, &set);

            assert_eq!(*signals.last().unwrap(), Signal::Sell);
        }

        #[test]
        fn no_bounce_no_buy() {
            // straight rally with closes always above EMA9: bounce never fires
            let bars: Vec<OhlcvBar> = (0..30)
                .map(|i| {
                    let c = 100.0 + (i as f64) * 3.0;
                    bar(i, c - 0.5, c + 0.5, c - 0.6, c)
                })
                .collect();
            let set = vwap_indicators(&bars);
            let signals = vwap_ema_confluence_signals(&bars, &set);

            assert!(!signals.contains(&Signal::Buy));
        }
    }

    mod position_deriver {
        use super::*;

        #[test]
        fn first_position_is_hold() {
            let positions = positions_from_signals(&[Signal::Buy, Signal::Sell]);
            assert_eq!(positions[0], Signal::Hold);
        }

        #[test]
        fn positions_are_signals_shifted_one_bar() {
            let signals = [Signal::Buy, Signal::Hold, Signal::Sell, Signal::Buy];
            let positions = positions_from_signals(&signals);

            assert_eq!(positions.len(), signals.len());
            for i in 1..signals.len() {
                assert_eq!(positions[i], signals[i - 1]);
            }
        }

        #[test]
        fn empty_signals() {
            assert!(positions_from_signals(&[]).is_empty());
        }
    }
}
