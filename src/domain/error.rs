//! Domain error types.

/// Top-level error type for papertrader.
///
/// Pure-computation failures (unknown indicator name, missing condition
/// operand) never appear here — they degrade to all-false series inside the
/// evaluator. Only boundary failures are surfaced.
#[derive(Debug, thiserror::Error)]
pub enum PapertraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid custom conditions: {reason}")]
    InvalidConditions { reason: String },

    #[error("no bar data for {symbol}")]
    NoData { symbol: String },

    #[error("failed to fetch bar data for {symbol}: {reason}")]
    DataFetch { symbol: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PapertraderError> for std::process::ExitCode {
    fn from(err: &PapertraderError) -> Self {
        let code: u8 = match err {
            PapertraderError::Io(_) => 1,
            PapertraderError::ConfigParse { .. }
            | PapertraderError::ConfigMissing { .. }
            | PapertraderError::ConfigInvalid { .. } => 2,
            PapertraderError::InvalidConditions { .. } => 4,
            PapertraderError::NoData { .. } | PapertraderError::DataFetch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_no_data() {
        let err = PapertraderError::NoData {
            symbol: "RELIANCE".into(),
        };
        assert_eq!(err.to_string(), "no bar data for RELIANCE");
    }

    #[test]
    fn display_config_invalid() {
        let err = PapertraderError::ConfigInvalid {
            section: "trading".into(),
            key: "initial_capital".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [trading] initial_capital: must be positive"
        );
    }

    #[test]
    fn exit_codes_are_distinct_per_class() {
        use std::process::ExitCode;

        let io: ExitCode = (&PapertraderError::Io(std::io::Error::other("x"))).into();
        let config: ExitCode = (&PapertraderError::ConfigMissing {
            section: "trading".into(),
            key: "initial_capital".into(),
        })
            .into();
        let data: ExitCode = (&PapertraderError::NoData {
            symbol: "TCS".into(),
        })
            .into();

        assert_eq!(format!("{io:?}"), format!("{:?}", ExitCode::from(1)));
        assert_eq!(format!("{config:?}"), format!("{:?}", ExitCode::from(2)));
        assert_eq!(format!("{data:?}"), format!("{:?}", ExitCode::from(5)));
    }
}
