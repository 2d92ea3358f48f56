//! Backtest pipeline orchestration and report shaping.
//!
//! bars → indicators → signals → position intents → execution → report.
//! Each stage produces a new series; nothing is recomputed mid-run. Monetary
//! fields are rounded to two decimals here, at the reporting boundary only,
//! and undefined indicator values receive their 0.0 display fallback here and
//! nowhere earlier.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::condition::{custom_signals, ConditionGroup};
use crate::domain::error::PapertraderError;
use crate::domain::execution::{run_backtest, ExecutionParams, Trade, TradeAction};
use crate::domain::indicator::{compute_all, IndicatorSet};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{positions_from_signals, Signal};
use crate::domain::strategy::{definition, Leverage, StrategyId};

pub const CUSTOM_STRATEGY_NAME: &str = "Custom Strategy";

#[derive(Debug, Clone, Serialize)]
pub struct TradeRecord {
    pub action: &'static str,
    pub date: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub x: String,
    pub y: f64,
}

/// Per-bar payload for the dashboard chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub timestamps: Vec<String>,
    pub close: Vec<f64>,
    pub indicators: BTreeMap<String, Vec<f64>>,
    pub signals: Vec<i8>,
    pub buy_markers: Vec<Marker>,
    pub sell_markers: Vec<Marker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub symbol: String,
    pub strategy: String,
    pub initial_capital: f64,
    pub final_value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub total_trades: usize,
    pub trades: Vec<TradeRecord>,
    pub chart_data: ChartData,
}

/// Round to two decimals; for reported monetary values only.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Run one of the registered strategies end to end.
pub fn run_named_strategy(
    bars: &[OhlcvBar],
    id: StrategyId,
    initial_capital: f64,
    leverage: Leverage,
    stop_loss_pct: f64,
) -> Result<BacktestReport, PapertraderError> {
    ensure_bars(bars)?;

    let def = definition(id);
    let set = (def.indicators)(bars);
    let signals = (def.signals)(bars, &set);
    let params = ExecutionParams {
        initial_capital,
        leverage,
        stop_loss_pct,
        exit_rules: def.exit_rules,
    };

    Ok(build_report(bars, id.name(), &set, &signals, &params))
}

/// Run a user-assembled condition strategy end to end. The full indicator
/// catalogue is computed so conditions can reference any published column.
pub fn run_custom_strategy(
    bars: &[OhlcvBar],
    buy: &ConditionGroup,
    sell: &ConditionGroup,
    initial_capital: f64,
    leverage: Leverage,
    stop_loss_pct: f64,
) -> Result<BacktestReport, PapertraderError> {
    ensure_bars(bars)?;

    let set = compute_all(bars);
    let signals = custom_signals(&set, buy, sell);
    let params = ExecutionParams {
        initial_capital,
        leverage,
        stop_loss_pct,
        exit_rules: None,
    };

    Ok(build_report(bars, CUSTOM_STRATEGY_NAME, &set, &signals, &params))
}

fn ensure_bars(bars: &[OhlcvBar]) -> Result<(), PapertraderError> {
    if bars.is_empty() {
        return Err(PapertraderError::NoData {
            symbol: "(empty series)".into(),
        });
    }
    Ok(())
}

fn build_report(
    bars: &[OhlcvBar],
    strategy_name: &str,
    set: &IndicatorSet,
    signals: &[Signal],
    params: &ExecutionParams,
) -> BacktestReport {
    let positions = positions_from_signals(signals);
    let outcome = run_backtest(bars, &positions, params);

    let trades: Vec<TradeRecord> = outcome.trades.iter().map(trade_record).collect();
    let (buy_markers, sell_markers) = trade_markers(&outcome.trades);

    let timestamps: Vec<String> = bars.iter().map(|b| b.date.format("%Y-%m-%d").to_string()).collect();
    let indicators: BTreeMap<String, Vec<f64>> = set
        .columns()
        .iter()
        .map(|(name, series)| {
            let display: Vec<f64> = series.iter().map(|v| v.unwrap_or(0.0)).collect();
            (name.clone(), display)
        })
        .collect();

    let pnl_percent = if params.initial_capital != 0.0 {
        outcome.pnl / params.initial_capital * 100.0
    } else {
        0.0
    };

    BacktestReport {
        symbol: bars[0].symbol.clone(),
        strategy: strategy_name.to_string(),
        initial_capital: params.initial_capital,
        final_value: round2(outcome.final_value),
        pnl: round2(outcome.pnl),
        pnl_percent: round2(pnl_percent),
        total_trades: outcome.trades.len(),
        trades,
        chart_data: ChartData {
            timestamps,
            close: bars.iter().map(|b| b.close).collect(),
            indicators,
            signals: signals.iter().map(|s| s.as_i8()).collect(),
            buy_markers,
            sell_markers,
        },
    }
}

fn trade_record(trade: &Trade) -> TradeRecord {
    TradeRecord {
        action: trade.action.as_str(),
        date: trade.date.format("%Y-%m-%d").to_string(),
        price: round2(trade.price),
        quantity: trade.quantity,
    }
}

fn trade_markers(trades: &[Trade]) -> (Vec<Marker>, Vec<Marker>) {
    let mut buys = Vec::new();
    let mut sells = Vec::new();
    for trade in trades {
        let marker = Marker {
            x: trade.date.format("%Y-%m-%d").to_string(),
            y: round2(trade.price),
        };
        match trade.action {
            TradeAction::Buy => buys.push(marker),
            TradeAction::Sell => sells.push(marker),
        }
    }
    (buys, sells)
}
