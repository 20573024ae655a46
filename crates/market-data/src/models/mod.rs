//! Market data models
//!
//! This module contains the core data types for exchange resolution:
//! - `ticker` - Validated ticker symbol (TickerSymbol)
//! - `exchange` - Venue codes and the qualified `EXCHANGE:TICKER` symbol
//! - `instrument` - Instrument record returned by the lookup service

mod exchange;
mod instrument;
mod ticker;

pub use exchange::{ExchangeCode, QualifiedSymbol, SYMBOL_SEPARATOR};
pub use instrument::InstrumentRecord;
pub use ticker::TickerSymbol;
