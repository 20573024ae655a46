//! Page scan: build a widget into every eligible mount.

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, error, info, warn};

use crate::dom::{WidgetKind, WidgetMount, ATTR_TICKER};
use crate::report::{ScanReport, SkipReason};
use crate::session::WidgetSession;

/// Scans the page for compact mounts and initializes them concurrently.
///
/// Advanced mounts belong to the position calculator and are left alone.
#[derive(Clone)]
pub struct WidgetScanner {
    session: Arc<WidgetSession>,
}

impl WidgetScanner {
    pub fn new(session: Arc<WidgetSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<WidgetSession> {
        &self.session
    }

    /// Initialize every eligible mount.
    ///
    /// Mounts are resolved and built independently; one mount failing never
    /// stops the others. Each widget takes the page theme current when it is
    /// written.
    pub async fn scan_and_initialize_all(&self) -> ScanReport {
        let mounts = self.session.document().mounts();
        let mut report = ScanReport::new();
        let mut eligible = Vec::new();

        for mount in mounts {
            match eligibility(&mount) {
                Some(reason) => report.record_skip(&mount.id, reason),
                None => eligible.push(mount),
            }
        }

        debug!(
            "Scanning {} widget mounts ({} skipped)",
            eligible.len(),
            report.skipped_count()
        );

        let results =
            join_all(eligible.iter().map(|mount| self.session.render_mount(mount))).await;
        for (mount, result) in eligible.iter().zip(results) {
            match result {
                Ok(outcome) => report.record_outcome(&mount.id, outcome),
                Err(e) => {
                    error!("Failed to initialize widget in {}: {}", mount.id, e);
                    report.record_error(&mount.id, e.category(), e.to_string());
                }
            }
        }

        info!(
            "Widget scan complete: {} rendered, {} skipped, {} failed",
            report.rendered_count(),
            report.skipped_count(),
            report.failed_count()
        );
        report
    }
}

fn eligibility(mount: &WidgetMount) -> Option<SkipReason> {
    if mount.kind == WidgetKind::Advanced {
        return Some(SkipReason::ExternallyManaged);
    }
    if !mount.use_external_widget {
        return Some(SkipReason::FeatureDisabled);
    }
    if mount.ticker.is_none() {
        warn!("Missing {} attribute on {}", ATTR_TICKER, mount.id);
        return Some(SkipReason::MissingTicker);
    }
    None
}
