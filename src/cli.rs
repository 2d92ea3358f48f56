//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::mock_data_adapter::MockDataAdapter;
use crate::domain::backtest::{self, BacktestReport};
use crate::domain::condition::{Condition, ConditionGroup, GroupLogic};
use crate::domain::error::PapertraderError;
use crate::domain::settings::{DataSource, Settings};
use crate::domain::strategy::{definition, Leverage, StrategyId};
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "papertrader", about = "Rule-based trading strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        /// Strategy name; unknown names fall back to the configured default
        #[arg(long)]
        strategy: Option<String>,
        /// Margin label (1x, 2x, 5x or 10x)
        #[arg(long)]
        margin: Option<String>,
        #[arg(long)]
        capital: Option<f64>,
        /// Use the seeded mock data provider
        #[arg(long)]
        mock: bool,
        /// Directory of <SYMBOL>.csv bar files
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        /// JSON file with custom buy/sell condition groups
        #[arg(long)]
        conditions: Option<PathBuf>,
        /// Emit the full report as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// List registered strategies and margin options
    ListStrategies,
    /// Start the dashboard API server
    #[cfg(feature = "web")]
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            strategy,
            margin,
            capital,
            mock,
            csv_dir,
            conditions,
            json,
        } => run_backtest_command(BacktestArgs {
            config,
            symbol,
            strategy,
            margin,
            capital,
            mock,
            csv_dir,
            conditions,
            json,
        }),
        Command::ListStrategies => run_list_strategies(),
        #[cfg(feature = "web")]
        Command::Serve { config } => run_serve(config.as_ref()),
    }
}

struct BacktestArgs {
    config: Option<PathBuf>,
    symbol: Option<String>,
    strategy: Option<String>,
    margin: Option<String>,
    capital: Option<f64>,
    mock: bool,
    csv_dir: Option<PathBuf>,
    conditions: Option<PathBuf>,
    json: bool,
}

fn run_backtest_command(args: BacktestArgs) -> ExitCode {
    let mut settings = match load_settings(args.config.as_ref()) {
        Ok(s) => s,
        Err(code) => return code,
    };

    if let Some(capital) = args.capital {
        if !capital.is_finite() || capital <= 0.0 {
            return report_error(&PapertraderError::ConfigInvalid {
                section: "trading".into(),
                key: "initial_capital".into(),
                reason: "must be positive".into(),
            });
        }
        settings.initial_capital = capital;
    }
    if let Some(symbol) = args.symbol {
        settings.default_symbol = symbol;
    }
    if let Some(margin) = &args.margin {
        settings.default_leverage = Leverage::parse(margin);
    }
    if args.mock {
        settings.data_source = DataSource::Mock;
    } else if let Some(dir) = args.csv_dir {
        settings.data_source = DataSource::Csv(dir);
    }

    let data_port = build_data_port(&settings);
    eprintln!("Fetching bars for {}", settings.default_symbol);
    let bars = match data_port.fetch_daily(&settings.default_symbol, settings.lookback_days) {
        Ok(bars) => bars,
        Err(e) => return report_error(&e),
    };

    let result = if let Some(path) = &args.conditions {
        let (buy, sell) = match load_conditions(path) {
            Ok(groups) => groups,
            Err(e) => return report_error(&e),
        };
        backtest::run_custom_strategy(
            &bars,
            &buy,
            &sell,
            settings.initial_capital,
            settings.default_leverage,
            settings.stop_loss_pct,
        )
    } else {
        let strategy = match args.strategy.as_deref() {
            Some(name) => {
                let resolved = StrategyId::resolve(name, settings.default_strategy);
                if StrategyId::from_name(name).is_none() {
                    log::warn!("unknown strategy {name:?}, running {}", resolved.name());
                }
                resolved
            }
            None => settings.default_strategy,
        };
        backtest::run_named_strategy(
            &bars,
            strategy,
            settings.initial_capital,
            settings.default_leverage,
            settings.stop_loss_pct,
        )
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => return report_error(&e),
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{body}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        print_summary(&report, settings.default_leverage, settings.stop_loss_pct);
    }
    ExitCode::SUCCESS
}

fn run_list_strategies() -> ExitCode {
    println!("Strategies:");
    for id in StrategyId::ALL {
        let def = definition(id);
        match def.exit_rules {
            Some(rules) => println!(
                "  {} (take-profit +{}, max hold {} bar)",
                id.name(),
                rules.take_profit,
                rules.hold_max_bars
            ),
            None => println!("  {}", id.name()),
        }
    }
    println!(
        "Margins: {}",
        Leverage::ALL
            .iter()
            .map(|l| l.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
    ExitCode::SUCCESS
}

#[cfg(feature = "web")]
fn run_serve(config: Option<&PathBuf>) -> ExitCode {
    use crate::adapters::web::{self, AppState};
    use std::sync::Arc;

    let settings = match load_settings(config) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let data_port: Arc<dyn DataPort + Send + Sync> = match &settings.data_source {
        DataSource::Mock => Arc::new(MockDataAdapter::default()),
        DataSource::Csv(dir) => Arc::new(CsvAdapter::new(dir.clone())),
    };
    let state = AppState {
        data_port,
        settings,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => return report_error(&PapertraderError::Io(e)),
    };
    match runtime.block_on(web::serve(state)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn load_settings(config: Option<&PathBuf>) -> Result<Settings, ExitCode> {
    let Some(path) = config else {
        return Ok(Settings::default());
    };

    eprintln!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| {
        report_error(&PapertraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    })?;
    Settings::load(&adapter).map_err(|e| report_error(&e))
}

fn build_data_port(settings: &Settings) -> Box<dyn DataPort> {
    match &settings.data_source {
        DataSource::Mock => Box::new(MockDataAdapter::default()),
        DataSource::Csv(dir) => Box::new(CsvAdapter::new(dir.clone())),
    }
}

#[derive(Debug, Deserialize)]
struct ConditionsFile {
    #[serde(default)]
    buy_conditions: Vec<Condition>,
    #[serde(default)]
    sell_conditions: Vec<Condition>,
    #[serde(default)]
    buy_logic: GroupLogic,
    #[serde(default)]
    sell_logic: GroupLogic,
}

fn load_conditions(path: &PathBuf) -> Result<(ConditionGroup, ConditionGroup), PapertraderError> {
    let content = fs::read_to_string(path)?;
    let file: ConditionsFile =
        serde_json::from_str(&content).map_err(|e| PapertraderError::InvalidConditions {
            reason: e.to_string(),
        })?;

    Ok((
        ConditionGroup {
            conditions: file.buy_conditions,
            logic: file.buy_logic,
        },
        ConditionGroup {
            conditions: file.sell_conditions,
            logic: file.sell_logic,
        },
    ))
}

fn print_summary(report: &BacktestReport, leverage: Leverage, stop_loss_pct: f64) {
    println!(
        "Strategy: {} | Margin: {} | {:.0}% stop-loss",
        report.strategy,
        leverage.label(),
        stop_loss_pct * 100.0
    );
    println!("Final Portfolio Value: {:.2}", report.final_value);
    println!("Net P&L: {:.2}", report.pnl);
    println!("Return: {:.2}%", report.pnl_percent);
    println!("Total Trades: {}", report.total_trades);

    if !report.trades.is_empty() {
        println!("\nTrade History:");
        for trade in &report.trades {
            println!(
                "  {}: {} @ {:.2} (Qty: {})",
                trade.action, trade.date, trade.price, trade.quantity
            );
        }
    }
}

fn report_error(err: &PapertraderError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_condition_groups_from_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "buy_conditions": [
                    {{"indicator": "RSI", "operator": "<", "value": 20}}
                ],
                "sell_conditions": [
                    {{"indicator": "RSI", "operator": ">", "value": 70}}
                ],
                "sell_logic": "OR"
            }}"#
        )
        .unwrap();

        let (buy, sell) = load_conditions(&file.path().to_path_buf()).unwrap();
        assert_eq!(buy.conditions.len(), 1);
        assert_eq!(buy.logic, GroupLogic::And);
        assert_eq!(sell.conditions.len(), 1);
        assert_eq!(sell.logic, GroupLogic::Or);
    }

    #[test]
    fn malformed_conditions_are_a_client_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        assert!(matches!(
            load_conditions(&file.path().to_path_buf()),
            Err(PapertraderError::InvalidConditions { .. })
        ));
    }

    #[test]
    fn missing_conditions_file_is_io_error() {
        assert!(matches!(
            load_conditions(&PathBuf::from("/nonexistent/conditions.json")),
            Err(PapertraderError::Io(_))
        ));
    }
}
