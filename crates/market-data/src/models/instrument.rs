use serde::Deserialize;

/// Instrument record returned by `GET /api/instruments/{ticker}`.
///
/// Only the fields needed for exchange resolution are decoded; the backend
/// sends a larger camelCase DTO and unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentRecord {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub asset_class: Option<String>,
    /// Venue label as reported by the broker feed (e.g. "NASDAQ", "ARCA").
    #[serde(default)]
    pub alpaca_exchange: Option<String>,
}

impl InstrumentRecord {
    /// Venue label, if present and non-blank.
    pub fn venue(&self) -> Option<&str> {
        self.alpaca_exchange
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}
