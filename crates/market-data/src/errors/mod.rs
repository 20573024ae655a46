//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for lookup and resolution
//! - [`FailureCategory`]: Classification used for diagnostics and fallback decisions

mod category;

pub use category::FailureCategory;

use thiserror::Error;

/// Errors that can occur while resolving a ticker to its exchange.
///
/// None of these are fatal to a dashboard session. The soft resolver path
/// turns every lookup or mapping error into a fallback symbol, and input
/// errors into "no widget".
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The ticker was empty or contained characters outside the allowed set.
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// The lookup service has no instrument for this ticker (HTTP 404).
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The instrument exists but carries no venue label.
    #[error("No venue recorded for {0}")]
    MissingVenue(String),

    /// The venue label is not part of the fixed venue table.
    #[error("Unmapped venue {venue:?} for {ticker}")]
    UnmappedVenue {
        /// The ticker being resolved
        ticker: String,
        /// The venue label returned by the lookup service
        venue: String,
    },

    /// The lookup service answered with a non-success status.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The lookup backend that failed
        provider: String,
        /// Status line or transport message
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A network error occurred while talking to the lookup service.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the failure category for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use chartsync_market_data::errors::{FailureCategory, MarketDataError};
    ///
    /// let error = MarketDataError::SymbolNotFound("ZZZZ".to_string());
    /// assert_eq!(error.category(), FailureCategory::Lookup);
    ///
    /// let error = MarketDataError::InvalidTicker(" ".to_string());
    /// assert_eq!(error.category(), FailureCategory::Input);
    /// ```
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::InvalidTicker(_) => FailureCategory::Input,

            Self::SymbolNotFound(_)
            | Self::ProviderError { .. }
            | Self::Decode(_)
            | Self::Network(_) => FailureCategory::Lookup,

            Self::MissingVenue(_) | Self::UnmappedVenue { .. } => FailureCategory::Mapping,
        }
    }
}
