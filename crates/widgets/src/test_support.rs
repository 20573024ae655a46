//! Shared fixtures for the widget tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use chartsync_market_data::{
    ExchangeResolver, InstrumentLookup, InstrumentRecord, MarketDataError, TickerSymbol,
};

use crate::memory::InMemoryDocument;
use crate::session::WidgetSession;
use crate::settings::WidgetSettings;

/// Scripted instrument backend.
///
/// Tickers registered with [`venue`](Self::venue) resolve; everything else is
/// not found. A gated ticker's lookup waits until its gate is notified.
#[derive(Clone, Default)]
pub struct MockLookup {
    venues: Arc<Mutex<HashMap<String, String>>>,
    gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
    calls: Arc<AtomicUsize>,
    calls_by_ticker: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn venue(&self, ticker: &str, venue: &str) {
        self.venues
            .lock()
            .unwrap()
            .insert(ticker.to_string(), venue.to_string());
    }

    pub fn gate(&self, ticker: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(ticker.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, ticker: &str) -> usize {
        self.calls_by_ticker
            .lock()
            .unwrap()
            .get(ticker)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl InstrumentLookup for MockLookup {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn fetch_instrument(
        &self,
        ticker: &TickerSymbol,
    ) -> Result<InstrumentRecord, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls_by_ticker
            .lock()
            .unwrap()
            .entry(ticker.to_string())
            .or_insert(0) += 1;

        let gate = self.gates.lock().unwrap().get(ticker.as_str()).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let venue = self.venues.lock().unwrap().get(ticker.as_str()).cloned();
        match venue {
            Some(venue) => Ok(InstrumentRecord {
                ticker: Some(ticker.to_string()),
                name: None,
                asset_class: None,
                alpaca_exchange: Some(venue),
            }),
            None => Err(MarketDataError::SymbolNotFound(ticker.to_string())),
        }
    }
}

pub fn session_with(lookup: &MockLookup, doc: &Arc<InMemoryDocument>) -> Arc<WidgetSession> {
    let resolver = Arc::new(ExchangeResolver::new(Arc::new(lookup.clone())));
    Arc::new(WidgetSession::new(
        resolver,
        doc.clone(),
        WidgetSettings::default(),
    ))
}

/// Decoded configuration from the embed script inside a mount.
pub fn script_config(doc: &InMemoryDocument, mount_id: &str) -> Value {
    let children = doc.children(mount_id).unwrap();
    let script = children
        .iter()
        .flat_map(|c| c.walk())
        .find(|e| e.tag == "script")
        .expect("script element");
    serde_json::from_str(script.text.as_deref().unwrap()).unwrap()
}
