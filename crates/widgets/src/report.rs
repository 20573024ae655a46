//! Per-mount outcome tracking for scans and rebuilds.

use chartsync_market_data::{FailureCategory, QualifiedSymbol};

/// Why a mount was not (re)built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Feature flag keeps the static image fallback.
    FeatureDisabled,

    /// Advanced charts are built by the calculator modal, not the scanner.
    ExternallyManaged,

    /// Mount has no ticker attribute.
    MissingTicker,

    /// Ticker attribute is present but malformed.
    InvalidTicker { ticker: String },

    /// Mount holds no widget content, so a theme change has nothing to redo.
    NotRendered,
}

/// Result of one resolve-and-build request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(QualifiedSymbol),
    /// A newer request for the same mount won; this result was discarded.
    Superseded,
    Skipped(SkipReason),
}

/// What happened to one mount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MountOutcome {
    Rendered { symbol: String },
    Superseded,
    Skipped(SkipReason),
    Failed {
        category: FailureCategory,
        message: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountAttempt {
    pub mount_id: String,
    pub outcome: MountOutcome,
}

/// Outcome of a scan or theme rebuild across all mounts.
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    pub attempts: Vec<MountAttempt>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    pub fn record_skip(&mut self, mount_id: &str, reason: SkipReason) {
        self.push(mount_id, MountOutcome::Skipped(reason));
    }

    pub fn record_outcome(&mut self, mount_id: &str, outcome: RenderOutcome) {
        let outcome = match outcome {
            RenderOutcome::Rendered(symbol) => MountOutcome::Rendered {
                symbol: symbol.to_string(),
            },
            RenderOutcome::Superseded => MountOutcome::Superseded,
            RenderOutcome::Skipped(reason) => MountOutcome::Skipped(reason),
        };
        self.push(mount_id, outcome);
    }

    pub fn record_error(&mut self, mount_id: &str, category: FailureCategory, message: String) {
        self.push(mount_id, MountOutcome::Failed { category, message });
    }

    fn push(&mut self, mount_id: &str, outcome: MountOutcome) {
        self.attempts.push(MountAttempt {
            mount_id: mount_id.to_string(),
            outcome,
        });
    }

    pub fn outcome(&self, mount_id: &str) -> Option<&MountOutcome> {
        self.attempts
            .iter()
            .find(|a| a.mount_id == mount_id)
            .map(|a| &a.outcome)
    }

    pub fn rendered(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, MountOutcome::Rendered { .. }))
            .map(|a| a.mount_id.as_str())
            .collect()
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered().len()
    }

    pub fn skipped_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, MountOutcome::Skipped(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, MountOutcome::Failed { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        if self.attempts.is_empty() {
            return "no mounts".to_string();
        }
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                MountOutcome::Rendered { symbol } => format!("{}:{}", a.mount_id, symbol),
                MountOutcome::Superseded => format!("{}(superseded)", a.mount_id),
                MountOutcome::Skipped(reason) => format!("{}(skipped: {:?})", a.mount_id, reason),
                MountOutcome::Failed { category, message } => {
                    format!("{}(failed, {}: {})", a.mount_id, category, message)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
