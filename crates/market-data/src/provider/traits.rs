//! Instrument lookup trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{InstrumentRecord, TickerSymbol};

/// Backend that knows which venue an instrument trades on.
///
/// Implementations perform exactly one request per call; caching is the
/// resolver's job.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use chartsync_market_data::provider::InstrumentLookup;
///
/// struct FixedLookup;
///
/// #[async_trait]
/// impl InstrumentLookup for FixedLookup {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_instrument(
///         &self,
///         ticker: &TickerSymbol,
///     ) -> Result<InstrumentRecord, MarketDataError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait InstrumentLookup: Send + Sync {
    /// Identifier used in logs and provider errors.
    fn id(&self) -> &'static str;

    /// Fetch the instrument record for a ticker.
    ///
    /// Returns [`MarketDataError::SymbolNotFound`] when the backend has no
    /// such instrument, and a lookup-category error for any other failure.
    async fn fetch_instrument(
        &self,
        ticker: &TickerSymbol,
    ) -> Result<InstrumentRecord, MarketDataError>;
}
