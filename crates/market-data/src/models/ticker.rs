use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Longest ticker accepted from page markup.
const MAX_TICKER_LEN: usize = 32;

/// Validated ticker symbol (e.g. "AAPL", "BRK.B").
///
/// Tickers come from page markup, so they are checked once on the way in:
/// surrounding whitespace is trimmed, and the remainder must be non-empty,
/// at most 32 characters, and made of ASCII alphanumerics, `.` or `-`.
/// Letters are uppercased, so "aapl" and "AAPL" are the same ticker.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(Arc<str>);

impl TickerSymbol {
    /// Parse a raw ticker, rejecting empty or malformed input.
    pub fn parse(raw: &str) -> Result<Self, MarketDataError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_TICKER_LEN {
            return Err(MarketDataError::InvalidTicker(raw.to_string()));
        }
        let valid = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid {
            return Err(MarketDataError::InvalidTicker(raw.to_string()));
        }
        Ok(Self(Arc::from(trimmed.to_ascii_uppercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TickerSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TickerSymbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = MarketDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for TickerSymbol {
    type Error = MarketDataError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.0.to_string()
    }
}
