//! Exchange resolution for chart symbols.
//!
//! Converts a bare ticker (e.g. "GDX") into the exchange-qualified symbol the
//! chart engine expects (e.g. "AMEX:GDX").
//!
//! # Resolution Order
//!
//! ```text
//! raw ticker
//!    │ validate ── invalid ──▶ None (no widget)
//!    ▼
//! ┌──────────────────────┐
//! │ session cache        │── hit ──▶ EXCHANGE:TICKER
//! └──────────────────────┘
//!    │ miss
//!    ▼
//! ┌──────────────────────┐
//! │ InstrumentLookup     │── error ──┐
//! └──────────────────────┘           │
//!    │ venue label                   │
//!    ▼                               │
//! ┌──────────────────────┐           │
//! │ VenueMap             │── unmapped┤
//! └──────────────────────┘           ▼
//!    │ code (cached)           NASDAQ:TICKER (not cached)
//!    ▼
//! EXCHANGE:TICKER
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chartsync_market_data::{ExchangeResolver, HttpInstrumentLookup};
//!
//! let lookup = HttpInstrumentLookup::new("http://localhost:8080");
//! let resolver = ExchangeResolver::new(Arc::new(lookup));
//! let symbol = resolver.resolve("GDX").await;
//! // symbol = Some("AMEX:GDX")
//! ```

mod exchange_resolver;
mod venue_map;

pub use exchange_resolver::ExchangeResolver;
pub use venue_map::VenueMap;
