//! Ticker to exchange resolution with a session-scoped cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{ExchangeCode, QualifiedSymbol, TickerSymbol};
use crate::provider::InstrumentLookup;

use super::venue_map::VenueMap;

/// Resolves tickers to exchange-qualified symbols.
///
/// Each resolver owns its cache; create one per dashboard session. Only
/// successful, mapped lookups are cached, so a ticker that failed once is
/// looked up again on the next call. A cached ticker is never looked up again
/// for the lifetime of the resolver.
///
/// Concurrent resolutions of the same uncached ticker may each issue a lookup
/// and race to write the cache; both write the same value.
pub struct ExchangeResolver {
    lookup: Arc<dyn InstrumentLookup>,
    venues: VenueMap,
    cache: RwLock<HashMap<TickerSymbol, ExchangeCode>>,
}

impl ExchangeResolver {
    /// Create a resolver with the default venue table.
    pub fn new(lookup: Arc<dyn InstrumentLookup>) -> Self {
        Self::with_venue_map(lookup, VenueMap::new())
    }

    /// Create a resolver with a custom venue table.
    pub fn with_venue_map(lookup: Arc<dyn InstrumentLookup>, venues: VenueMap) -> Self {
        Self {
            lookup,
            venues,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve a raw ticker from page markup, failing soft.
    ///
    /// Returns `None` only for empty or malformed tickers. Lookup and mapping
    /// failures are logged and fall back to the default exchange.
    pub async fn resolve(&self, raw: &str) -> Option<QualifiedSymbol> {
        match TickerSymbol::parse(raw) {
            Ok(ticker) => Some(self.resolve_ticker(&ticker).await),
            Err(e) => {
                warn!("Skipping resolution ({} error): {}", e.category(), e);
                None
            }
        }
    }

    /// Resolve a validated ticker, falling back to the default exchange on
    /// any failure.
    pub async fn resolve_ticker(&self, ticker: &TickerSymbol) -> QualifiedSymbol {
        match self.lookup_exchange(ticker).await {
            Ok(exchange) => QualifiedSymbol::new(exchange, ticker.clone()),
            Err(e) => {
                let fallback = QualifiedSymbol::fallback(ticker.clone());
                warn!(
                    "Resolution failed for {} ({} error: {}), using {}",
                    ticker,
                    e.category(),
                    e,
                    fallback
                );
                fallback
            }
        }
    }

    /// Resolve a ticker's exchange code, surfacing the failure to the caller.
    ///
    /// Consults the cache first; on a miss issues exactly one lookup.
    pub async fn lookup_exchange(
        &self,
        ticker: &TickerSymbol,
    ) -> Result<ExchangeCode, MarketDataError> {
        if let Some(exchange) = self.cached_exchange(ticker.as_str()) {
            debug!("Cache hit for {}: {}", ticker, exchange);
            return Ok(exchange);
        }

        debug!("Cache miss for {}, querying {}", ticker, self.lookup.id());
        let record = self.lookup.fetch_instrument(ticker).await?;

        let venue = record
            .venue()
            .ok_or_else(|| MarketDataError::MissingVenue(ticker.to_string()))?;

        let exchange =
            self.venues
                .lookup(venue)
                .ok_or_else(|| MarketDataError::UnmappedVenue {
                    ticker: ticker.to_string(),
                    venue: venue.to_string(),
                })?;

        self.write_cache().insert(ticker.clone(), exchange);
        debug!("Resolved {} via venue {} to {}", ticker, venue, exchange);
        Ok(exchange)
    }

    /// Cached exchange for a ticker, without any lookup.
    pub fn cached_exchange(&self, ticker: &str) -> Option<ExchangeCode> {
        self.read_cache().get(ticker).copied()
    }

    /// Number of cached tickers.
    pub fn cache_len(&self) -> usize {
        self.read_cache().len()
    }

    /// Lock the cache for reading, recovering from poison if necessary.
    ///
    /// Entries are plain upserts of `Copy` values, so a poisoned lock still
    /// holds a consistent map.
    fn read_cache(&self) -> RwLockReadGuard<'_, HashMap<TickerSymbol, ExchangeCode>> {
        self.cache.read().unwrap_or_else(|poisoned| {
            warn!("Resolution cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, HashMap<TickerSymbol, ExchangeCode>> {
        self.cache.write().unwrap_or_else(|poisoned| {
            warn!("Resolution cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
