//! Bar series provider port.

use crate::domain::error::PapertraderError;
use crate::domain::ohlcv::OhlcvBar;

/// Supplies daily bars for a symbol, oldest first, no gaps assumed.
///
/// Implementations must fail with [`PapertraderError::NoData`] when no bars
/// can be produced — never substitute fabricated data for a failed fetch.
pub trait DataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        lookback_days: usize,
    ) -> Result<Vec<OhlcvBar>, PapertraderError>;
}
