//! Chartsync Market Data Crate
//!
//! Resolves bare tickers to the exchange-qualified symbols that embedded
//! chart widgets require.
//!
//! # Overview
//!
//! - Validated ticker identity ([`TickerSymbol`])
//! - Instrument lookup against the dashboard backend ([`HttpInstrumentLookup`])
//! - Fixed venue label table ([`VenueMap`])
//! - Session-scoped resolution cache ([`ExchangeResolver`])
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Widget layer    | --> |  ExchangeResolver|  (cache, fallback)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | InstrumentLookup |  (GET /api/instruments/{ticker})
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    VenueMap      |  (ARCA -> AMEX, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | QualifiedSymbol  |  ("AMEX:GDX")
//!                          +------------------+
//! ```

pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;

pub use errors::{FailureCategory, MarketDataError};
pub use models::{ExchangeCode, InstrumentRecord, QualifiedSymbol, TickerSymbol};
pub use provider::{HttpInstrumentLookup, InstrumentLookup, DEFAULT_LOOKUP_TIMEOUT};
pub use resolver::{ExchangeResolver, VenueMap};
