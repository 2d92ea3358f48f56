//! Backtest execution engine.
//!
//! A finite-state machine (FLAT ⇄ LONG) threaded through a per-bar fold over
//! the position-intent series. One action per bar at most: an entry when
//! flat, or one exit check when long, in strict priority order — stop-loss,
//! then strategy exit rules, then signal-driven exit. An open position at the
//! last bar is marked to market but never auto-closed into a trade.

use chrono::NaiveDate;

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::Signal;
use crate::domain::strategy::{ExitRules, Leverage};

/// Universal stop-loss: force exit when position value falls below this
/// fraction of its entry value.
pub const DEFAULT_STOP_LOSS_PCT: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }
}

/// One ledger entry. The ledger is append-only and chronological.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub action: TradeAction,
    pub date: NaiveDate,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct ExecutionParams {
    pub initial_capital: f64,
    pub leverage: Leverage,
    pub stop_loss_pct: f64,
    pub exit_rules: Option<ExitRules>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        ExecutionParams {
            initial_capital: 100_000.0,
            leverage: Leverage::X1,
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
            exit_rules: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PositionState {
    Flat,
    Long {
        quantity: i64,
        entry_price: f64,
        entry_index: usize,
    },
}

#[derive(Debug, Clone)]
pub struct BacktestOutcome {
    pub final_value: f64,
    pub pnl: f64,
    pub trades: Vec<Trade>,
}

/// Run the execution loop over aligned bars and position intents.
///
/// Entry sizing: buying power is leverage × starting capital, and the unit
/// count is capped at the leverage multiplier itself, never below one unit —
/// an unaffordable entry is silently skipped, not an error.
pub fn run_backtest(
    bars: &[OhlcvBar],
    positions: &[Signal],
    params: &ExecutionParams,
) -> BacktestOutcome {
    debug_assert_eq!(bars.len(), positions.len());

    let mut cash = params.initial_capital;
    let mut state = PositionState::Flat;
    let mut trades: Vec<Trade> = Vec::new();

    for i in 1..bars.len().min(positions.len()) {
        let price = bars[i].close;
        let date = bars[i].date;

        state = match state {
            PositionState::Flat => {
                if positions[i] == Signal::Buy {
                    try_enter(&mut cash, &mut trades, params, price, date, i)
                } else {
                    PositionState::Flat
                }
            }
            PositionState::Long {
                quantity,
                entry_price,
                entry_index,
            } => {
                if should_exit(
                    params,
                    positions[i],
                    price,
                    quantity,
                    entry_price,
                    entry_index,
                    i,
                ) {
                    cash += quantity as f64 * price;
                    trades.push(Trade {
                        action: TradeAction::Sell,
                        date,
                        price,
                        quantity,
                    });
                    PositionState::Flat
                } else {
                    state
                }
            }
        };
    }

    let open_value = match state {
        PositionState::Long { quantity, .. } => {
            quantity as f64 * bars.last().map(|b| b.close).unwrap_or(0.0)
        }
        PositionState::Flat => 0.0,
    };
    let final_value = cash + open_value;

    BacktestOutcome {
        final_value,
        pnl: final_value - params.initial_capital,
        trades,
    }
}

fn try_enter(
    cash: &mut f64,
    trades: &mut Vec<Trade>,
    params: &ExecutionParams,
    price: f64,
    date: NaiveDate,
    index: usize,
) -> PositionState {
    let multiplier = params.leverage.multiplier();
    let buying_power = multiplier as f64 * params.initial_capital;
    let affordable = (buying_power / price).floor() as i64;
    let quantity = multiplier.min(affordable);

    if quantity < 1 {
        return PositionState::Flat;
    }

    *cash -= quantity as f64 * price;
    trades.push(Trade {
        action: TradeAction::Buy,
        date,
        price,
        quantity,
    });

    PositionState::Long {
        quantity,
        entry_price: price,
        entry_index: index,
    }
}

/// Exit priority: stop-loss first, then configured exit rules, else the
/// sell signal. With exit rules configured the sell signal is ignored.
fn should_exit(
    params: &ExecutionParams,
    intent: Signal,
    price: f64,
    quantity: i64,
    entry_price: f64,
    entry_index: usize,
    index: usize,
) -> bool {
    let position_value = quantity as f64 * price;
    let entry_value = quantity as f64 * entry_price;
    if position_value < params.stop_loss_pct * entry_value {
        return true;
    }

    if let Some(rules) = params.exit_rules {
        return price >= entry_price + rules.take_profit
            || (rules.hold_max_bars == 1 && index > entry_index);
    }

    intent == Signal::Sell
}
