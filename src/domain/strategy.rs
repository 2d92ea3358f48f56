//! Strategy registry and run parameters.
//!
//! The registry is a closed mapping from strategy identifier to its indicator
//! computation, signal function, and optional exit rules — resolved once, not
//! a dynamic name-to-function lookup. Unknown names fall back to the default
//! strategy; unknown margin labels fall back to 1x. Both fallbacks are the
//! caller's to report.

use crate::domain::indicator::IndicatorSet;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{self, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyId {
    SmaCrossover,
    RsiOversold,
    VwapTrendRider,
    VwapEmaConfluence,
}

pub const DEFAULT_STRATEGY: StrategyId = StrategyId::SmaCrossover;

impl StrategyId {
    pub const ALL: [StrategyId; 4] = [
        StrategyId::SmaCrossover,
        StrategyId::RsiOversold,
        StrategyId::VwapTrendRider,
        StrategyId::VwapEmaConfluence,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyId::SmaCrossover => "SMA Crossover",
            StrategyId::RsiOversold => "RSI Oversold",
            StrategyId::VwapTrendRider => "VWAP Trend Rider",
            StrategyId::VwapEmaConfluence => "VWAP + EMA Confluence",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }

    /// Resolve a user-supplied name, falling back to `default` when unknown.
    pub fn resolve(name: &str, default: StrategyId) -> StrategyId {
        Self::from_name(name).unwrap_or(default)
    }
}

/// Strategy-specific exit overrides. Exit rules only activate when both
/// fields are configured; a partial pair falls back to signal-driven exits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitRules {
    /// Absolute price gain that closes the position.
    pub take_profit: f64,
    /// Maximum bars to hold; only a value of 1 (exit on the bar after entry)
    /// is currently meaningful.
    pub hold_max_bars: usize,
}

/// Margin multiplier on starting capital. Defines both maximum buying power
/// and the per-entry unit cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Leverage {
    #[default]
    X1,
    X2,
    X5,
    X10,
}

impl Leverage {
    pub const ALL: [Leverage; 4] = [Leverage::X1, Leverage::X2, Leverage::X5, Leverage::X10];

    pub fn multiplier(self) -> i64 {
        match self {
            Leverage::X1 => 1,
            Leverage::X2 => 2,
            Leverage::X5 => 5,
            Leverage::X10 => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Leverage::X1 => "1x",
            Leverage::X2 => "2x",
            Leverage::X5 => "5x",
            Leverage::X10 => "10x",
        }
    }

    /// Parse a margin label; anything unrecognized is 1x.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }
}

/// One registry entry: everything needed to run a named strategy.
#[derive(Debug, Clone, Copy)]
pub struct StrategyDef {
    pub id: StrategyId,
    pub indicators: fn(&[OhlcvBar]) -> IndicatorSet,
    pub signals: fn(&[OhlcvBar], &IndicatorSet) -> Vec<Signal>,
    pub exit_rules: Option<ExitRules>,
}

pub fn definition(id: StrategyId) -> StrategyDef {
    match id {
        StrategyId::SmaCrossover => StrategyDef {
            id,
            indicators: signal::sma_crossover_indicators,
            signals: signal::sma_crossover_signals,
            exit_rules: None,
        },
        StrategyId::RsiOversold => StrategyDef {
            id,
            indicators: signal::rsi_oversold_indicators,
            signals: signal::rsi_oversold_signals,
            exit_rules: Some(ExitRules {
                take_profit: 10.0,
                hold_max_bars: 1,
            }),
        },
        StrategyId::VwapTrendRider => StrategyDef {
            id,
            indicators: signal::vwap_indicators,
            signals: signal::vwap_trend_rider_signals,
            exit_rules: None,
        },
        StrategyId::VwapEmaConfluence => StrategyDef {
            id,
            indicators: signal::vwap_indicators,
            signals: signal::vwap_ema_confluence_signals,
            exit_rules: None,
        },
    }
}
