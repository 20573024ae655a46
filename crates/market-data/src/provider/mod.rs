//! Instrument lookup abstractions and implementations.
//!
//! This module contains:
//! - The `InstrumentLookup` trait the resolver consumes
//! - `HttpInstrumentLookup`, the reqwest client for the dashboard backend

mod http;
mod traits;

pub use http::{HttpInstrumentLookup, DEFAULT_LOOKUP_TIMEOUT};
pub use traits::InstrumentLookup;
