//! Typed application settings loaded through the config port.
//!
//! Every key has a default; numeric values are validated on load. Unknown
//! strategy names and margin labels fall back to their defaults with a
//! warning, so a typo in a config file degrades the run instead of killing it.

use std::path::PathBuf;

use crate::domain::error::PapertraderError;
use crate::domain::execution::DEFAULT_STOP_LOSS_PCT;
use crate::domain::strategy::{Leverage, StrategyId, DEFAULT_STRATEGY};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_SYMBOL: &str = "RELIANCE";
pub const DEFAULT_LOOKBACK_DAYS: usize = 365;
pub const DEFAULT_PORT_START: u16 = 5000;
pub const DEFAULT_PORT_ATTEMPTS: u16 = 10;

/// Where daily bars come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Mock,
    Csv(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub initial_capital: f64,
    pub default_symbol: String,
    pub default_strategy: StrategyId,
    pub default_leverage: Leverage,
    pub stop_loss_pct: f64,
    pub data_source: DataSource,
    pub lookback_days: usize,
    pub port_start: u16,
    pub port_attempts: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            default_symbol: DEFAULT_SYMBOL.into(),
            default_strategy: DEFAULT_STRATEGY,
            default_leverage: Leverage::X1,
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
            data_source: DataSource::Mock,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            port_start: DEFAULT_PORT_START,
            port_attempts: DEFAULT_PORT_ATTEMPTS,
        }
    }
}

impl Settings {
    pub fn load(config: &dyn ConfigPort) -> Result<Self, PapertraderError> {
        let defaults = Settings::default();

        let initial_capital =
            config.get_double("trading", "initial_capital", defaults.initial_capital);
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(invalid("trading", "initial_capital", "must be positive"));
        }

        let stop_loss_pct = config.get_double("trading", "stop_loss_pct", defaults.stop_loss_pct);
        if !stop_loss_pct.is_finite() || stop_loss_pct <= 0.0 || stop_loss_pct >= 1.0 {
            return Err(invalid(
                "trading",
                "stop_loss_pct",
                "must be a fraction between 0 and 1",
            ));
        }

        let lookback_days = config.get_int("data", "lookback_days", defaults.lookback_days as i64);
        if lookback_days < 1 {
            return Err(invalid("data", "lookback_days", "must be at least 1"));
        }

        let default_strategy = match config.get_string("trading", "default_strategy") {
            Some(name) => {
                let resolved = StrategyId::resolve(&name, defaults.default_strategy);
                if StrategyId::from_name(&name).is_none() {
                    log::warn!(
                        "unknown default_strategy {name:?}, using {}",
                        resolved.name()
                    );
                }
                resolved
            }
            None => defaults.default_strategy,
        };

        let default_leverage = match config.get_string("trading", "default_margin") {
            Some(label) => Leverage::parse(&label),
            None => defaults.default_leverage,
        };

        let data_source = match config
            .get_string("data", "source")
            .unwrap_or_else(|| "mock".into())
            .to_lowercase()
            .as_str()
        {
            "mock" => DataSource::Mock,
            "csv" => {
                let dir = config.get_string("data", "csv_dir").ok_or_else(|| {
                    PapertraderError::ConfigMissing {
                        section: "data".into(),
                        key: "csv_dir".into(),
                    }
                })?;
                DataSource::Csv(PathBuf::from(dir))
            }
            other => {
                return Err(invalid(
                    "data",
                    "source",
                    &format!("unknown source {other:?}, expected mock or csv"),
                ));
            }
        };

        let port_start = config.get_int("server", "port_start", defaults.port_start as i64);
        let port_attempts =
            config.get_int("server", "port_attempts", defaults.port_attempts as i64);
        if !(1..=u16::MAX as i64).contains(&port_start) {
            return Err(invalid("server", "port_start", "must be a valid port"));
        }
        if !(1..=u16::MAX as i64).contains(&port_attempts) {
            return Err(invalid("server", "port_attempts", "must be at least 1"));
        }

        Ok(Settings {
            initial_capital,
            default_symbol: config
                .get_string("trading", "default_symbol")
                .unwrap_or(defaults.default_symbol),
            default_strategy,
            default_leverage,
            stop_loss_pct,
            data_source,
            lookback_days: lookback_days as usize,
            port_start: port_start as u16,
            port_attempts: port_attempts as u16,
        })
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> PapertraderError {
    PapertraderError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}
