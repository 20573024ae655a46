//! Venue label to exchange code table.
//!
//! The lookup service reports venues using broker feed labels ("ARCA",
//! "BATS", ...). The table is embedded from `venues.json` at compile time and
//! indexed once via `lazy_static`. ARCA-listed products map to `AMEX`, the
//! code the rendering engine uses for them; `NYSEARCA` is accepted only as an
//! input alias.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::error;
use serde::Deserialize;

use crate::models::ExchangeCode;

#[derive(Debug, Deserialize)]
struct VenueCatalog {
    venues: Vec<VenueEntry>,
}

#[derive(Debug, Deserialize)]
struct VenueEntry {
    code: ExchangeCode,
    labels: Vec<String>,
}

lazy_static! {
    static ref DEFAULT_VENUES: HashMap<String, ExchangeCode> = {
        let catalog: VenueCatalog = match serde_json::from_str(include_str!("venues.json")) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Embedded venue table is invalid: {}", e);
                VenueCatalog { venues: Vec::new() }
            }
        };
        let mut index = HashMap::new();
        for entry in catalog.venues {
            for label in entry.labels {
                index.insert(normalize(&label), entry.code);
            }
        }
        index
    };
}

fn normalize(label: &str) -> String {
    label.trim().to_ascii_uppercase()
}

/// Fixed mapping from venue label to [`ExchangeCode`].
///
/// Labels are matched case-insensitively after trimming. Unknown labels
/// return `None`; this layer never substitutes a default.
#[derive(Clone, Debug)]
pub struct VenueMap {
    labels: HashMap<String, ExchangeCode>,
}

impl Default for VenueMap {
    fn default() -> Self {
        Self::new()
    }
}

impl VenueMap {
    /// Create a VenueMap with the embedded default table.
    pub fn new() -> Self {
        Self {
            labels: DEFAULT_VENUES.clone(),
        }
    }

    /// Create an empty VenueMap.
    pub fn empty() -> Self {
        Self {
            labels: HashMap::new(),
        }
    }

    /// Add or replace a label mapping.
    pub fn insert(&mut self, label: &str, code: ExchangeCode) {
        self.labels.insert(normalize(label), code);
    }

    /// Map a venue label to its exchange code.
    pub fn lookup(&self, label: &str) -> Option<ExchangeCode> {
        self.labels.get(&normalize(label)).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_venues() {
        let map = VenueMap::new();
        assert_eq!(map.lookup("NASDAQ"), Some(ExchangeCode::Nasdaq));
        assert_eq!(map.lookup("NYSE"), Some(ExchangeCode::Nyse));
        assert_eq!(map.lookup("AMEX"), Some(ExchangeCode::Amex));
        assert_eq!(map.lookup("CBOE"), Some(ExchangeCode::Cboe));
        assert_eq!(map.lookup("PINK"), Some(ExchangeCode::Pink));
    }

    #[test]
    fn test_arca_maps_to_amex() {
        let map = VenueMap::new();
        assert_eq!(map.lookup("ARCA"), Some(ExchangeCode::Amex));
        assert_eq!(map.lookup("NYSEARCA"), Some(ExchangeCode::Amex));
        assert_eq!(map.lookup("NYSE ARCA"), Some(ExchangeCode::Amex));
    }

    #[test]
    fn test_aliases() {
        let map = VenueMap::new();
        assert_eq!(map.lookup("BATS"), Some(ExchangeCode::Cboe));
        assert_eq!(map.lookup("OTC"), Some(ExchangeCode::Pink));
        assert_eq!(map.lookup("NYSEMKT"), Some(ExchangeCode::Amex));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let map = VenueMap::new();
        assert_eq!(map.lookup(" nasdaq "), Some(ExchangeCode::Nasdaq));
        assert_eq!(map.lookup("Arca"), Some(ExchangeCode::Amex));
    }

    #[test]
    fn test_unknown_label_is_none() {
        let map = VenueMap::new();
        assert_eq!(map.lookup("LSE"), None);
        assert_eq!(map.lookup(""), None);
    }

    #[test]
    fn test_custom_entries() {
        let mut map = VenueMap::empty();
        assert!(map.is_empty());
        map.insert("iex", ExchangeCode::Cboe);
        assert_eq!(map.len(), 1);
        assert_eq!(map.lookup("IEX"), Some(ExchangeCode::Cboe));
        assert_eq!(map.lookup("NASDAQ"), None);
    }
}
