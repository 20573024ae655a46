//! HTTP instrument lookup against the dashboard backend.
//!
//! # API Endpoint
//!
//! - Instrument by ticker: `{base_url}/api/instruments/{ticker}`
//!
//! The backend answers 200 with the instrument DTO, 404 when the ticker is
//! unknown, and 500 on internal failure.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};

use crate::errors::MarketDataError;
use crate::models::{InstrumentRecord, TickerSymbol};
use crate::provider::InstrumentLookup;

const PROVIDER_ID: &str = "INSTRUMENT_API";

/// Default HTTP request timeout
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Instrument lookup backed by the dashboard's REST endpoint.
pub struct HttpInstrumentLookup {
    client: Client,
    base_url: String,
}

impl HttpInstrumentLookup {
    /// Create a lookup client for the given backend base URL
    /// (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_LOOKUP_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn instrument_url(&self, ticker: &TickerSymbol) -> String {
        format!(
            "{}/api/instruments/{}",
            self.base_url,
            urlencoding::encode(ticker.as_str())
        )
    }
}

#[async_trait]
impl InstrumentLookup for HttpInstrumentLookup {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_instrument(
        &self,
        ticker: &TickerSymbol,
    ) -> Result<InstrumentRecord, MarketDataError> {
        let url = self.instrument_url(ticker);
        debug!("Fetching instrument {} from {}", ticker, url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(ticker.to_string()));
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP error: {}", status),
            });
        }

        let body = response.text().await?;
        let record: InstrumentRecord = serde_json::from_str(&body)?;
        Ok(record)
    }
}
