//! Error types for widget construction and session handling.

use chartsync_market_data::{FailureCategory, MarketDataError};
use thiserror::Error;

/// Result alias used throughout the widgets crate.
pub type Result<T> = std::result::Result<T, WidgetError>;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("Mount not found: {0}")]
    MountNotFound(String),

    #[error("Missing ticker for mount {0}")]
    MissingTicker(String),

    /// The chart engine script did not load within the bootstrap timeout.
    #[error("Chart engine not available after {timeout_ms} ms")]
    EngineUnavailable { timeout_ms: u64 },

    #[error("Failed to serialize widget configuration: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

impl WidgetError {
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::MountNotFound(_) | Self::MissingTicker(_) => FailureCategory::Input,
            Self::EngineUnavailable { .. } | Self::Serialization(_) => {
                FailureCategory::Environment
            }
            Self::MarketData(e) => e.category(),
        }
    }
}
