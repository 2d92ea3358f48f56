//! Request handlers.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{AppState, WebError};
use crate::domain::backtest::{run_custom_strategy, run_named_strategy, BacktestReport};
use crate::domain::condition::{Condition, ConditionGroup, GroupLogic};
use crate::domain::strategy::{definition, Leverage, StrategyId};

#[derive(Debug, Deserialize)]
pub struct BacktestQuery {
    pub symbol: Option<String>,
    pub strategy: Option<String>,
    pub margin: Option<String>,
}

/// `GET /api/backtest?symbol=&strategy=&margin=`
///
/// Unknown strategy names and margin labels fall back to the configured
/// defaults; the report's `strategy` field carries the name actually run, so
/// a substitution is visible to the caller.
pub async fn backtest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BacktestQuery>,
) -> Result<Json<BacktestReport>, WebError> {
    let settings = &state.settings;

    let symbol = query
        .symbol
        .unwrap_or_else(|| settings.default_symbol.clone());
    let strategy = match query.strategy.as_deref() {
        Some(name) => {
            let resolved = StrategyId::resolve(name, settings.default_strategy);
            if StrategyId::from_name(name).is_none() {
                log::warn!("unknown strategy {name:?}, running {}", resolved.name());
            }
            resolved
        }
        None => settings.default_strategy,
    };
    let leverage = query
        .margin
        .as_deref()
        .map(Leverage::parse)
        .unwrap_or(settings.default_leverage);

    let bars = state.data_port.fetch_daily(&symbol, settings.lookback_days)?;
    let report = run_named_strategy(
        &bars,
        strategy,
        settings.initial_capital,
        leverage,
        settings.stop_loss_pct,
    )?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct CustomBacktestRequest {
    pub symbol: Option<String>,
    pub margin: Option<String>,
    #[serde(default)]
    pub buy_conditions: Vec<Condition>,
    #[serde(default)]
    pub sell_conditions: Vec<Condition>,
    #[serde(default)]
    pub buy_logic: GroupLogic,
    #[serde(default)]
    pub sell_logic: GroupLogic,
}

/// `POST /api/backtest/custom`
///
/// A structurally invalid body is rejected before this handler runs; an
/// individually broken condition inside a valid body degrades to an all-false
/// series instead of failing the request.
pub async fn custom_backtest(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CustomBacktestRequest>,
) -> Result<Json<BacktestReport>, WebError> {
    let settings = &state.settings;

    let symbol = request
        .symbol
        .unwrap_or_else(|| settings.default_symbol.clone());
    let leverage = request
        .margin
        .as_deref()
        .map(Leverage::parse)
        .unwrap_or(settings.default_leverage);

    let buy = ConditionGroup {
        conditions: request.buy_conditions,
        logic: request.buy_logic,
    };
    let sell = ConditionGroup {
        conditions: request.sell_conditions,
        logic: request.sell_logic,
    };

    let bars = state.data_port.fetch_daily(&symbol, settings.lookback_days)?;
    let report = run_custom_strategy(
        &bars,
        &buy,
        &sell,
        settings.initial_capital,
        leverage,
        settings.stop_loss_pct,
    )?;
    Ok(Json(report))
}

#[derive(Debug, Serialize)]
pub struct StrategyInfo {
    pub name: &'static str,
    pub has_exit_rules: bool,
}

#[derive(Debug, Serialize)]
pub struct StrategiesResponse {
    pub strategies: Vec<StrategyInfo>,
    pub margins: Vec<&'static str>,
    pub default_strategy: String,
}

/// `GET /api/strategies`
pub async fn list_strategies(State(state): State<Arc<AppState>>) -> Json<StrategiesResponse> {
    let strategies = StrategyId::ALL
        .into_iter()
        .map(|id| StrategyInfo {
            name: id.name(),
            has_exit_rules: definition(id).exit_rules.is_some(),
        })
        .collect();

    Json(StrategiesResponse {
        strategies,
        margins: Leverage::ALL.iter().map(|l| l.label()).collect(),
        default_strategy: state.settings.default_strategy.name().to_string(),
    })
}

pub async fn not_found() -> WebError {
    WebError::not_found("no such endpoint")
}
