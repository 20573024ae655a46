use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ticker::TickerSymbol;

/// Separator between exchange code and ticker in a qualified symbol.
pub const SYMBOL_SEPARATOR: char = ':';

/// Trading venue code understood by the chart rendering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExchangeCode {
    #[default]
    Nasdaq,
    Nyse,
    Amex,
    Cboe,
    Pink,
}

impl ExchangeCode {
    /// Exchange used whenever a ticker cannot be resolved.
    pub const FALLBACK: ExchangeCode = ExchangeCode::Nasdaq;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nasdaq => "NASDAQ",
            Self::Nyse => "NYSE",
            Self::Amex => "AMEX",
            Self::Cboe => "CBOE",
            Self::Pink => "PINK",
        }
    }
}

impl std::fmt::Display for ExchangeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NASDAQ" => Ok(Self::Nasdaq),
            "NYSE" => Ok(Self::Nyse),
            "AMEX" => Ok(Self::Amex),
            "CBOE" => Ok(Self::Cboe),
            "PINK" => Ok(Self::Pink),
            other => Err(format!("unknown exchange code: {}", other)),
        }
    }
}

/// Exchange-qualified symbol in the `EXCHANGE:TICKER` form the rendering
/// engine expects. Derived on every resolution, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedSymbol {
    pub exchange: ExchangeCode,
    pub ticker: TickerSymbol,
}

impl QualifiedSymbol {
    pub fn new(exchange: ExchangeCode, ticker: TickerSymbol) -> Self {
        Self { exchange, ticker }
    }

    /// Qualified symbol on the fallback exchange.
    pub fn fallback(ticker: TickerSymbol) -> Self {
        Self::new(ExchangeCode::FALLBACK, ticker)
    }
}

impl std::fmt::Display for QualifiedSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.exchange, SYMBOL_SEPARATOR, self.ticker)
    }
}

impl Serialize for QualifiedSymbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
