//! Theme propagation into live widgets.
//!
//! The chart engine cannot restyle a built widget, so a theme change rebuilds
//! every widget currently on the page. Widgets always take the theme the page
//! carries when they are written, so the root attribute must be updated before
//! the coordinator is notified. Resolution goes through the session cache, so
//! a rebuild re-fetches nothing that resolved before.

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, error, info};
use tokio::task::JoinHandle;

use crate::dom::WidgetMount;
use crate::report::{ScanReport, SkipReason};
use crate::session::{PendingRender, WidgetSession};
use crate::theme::Theme;

/// Rebuilds claimed for one theme change, not yet run.
#[derive(Debug)]
pub struct ThemeRebuild {
    theme: Theme,
    report: ScanReport,
    pending: Vec<PendingRender>,
}

#[derive(Clone)]
pub struct ThemeCoordinator {
    session: Arc<WidgetSession>,
}

impl ThemeCoordinator {
    pub fn new(session: Arc<WidgetSession>) -> Self {
        Self { session }
    }

    /// Schedule a rebuild of all live widgets and return immediately.
    ///
    /// Must be called from within a tokio runtime. The rebuilds are claimed
    /// before this returns, so a later theme change or symbol pick always
    /// supersedes them. Rebuild order across mounts is unspecified.
    pub fn on_theme_changed(&self, theme: Theme) -> JoinHandle<ScanReport> {
        info!("Theme changed to {}, rebuilding widgets", theme);
        let rebuild = self.begin_rebuild(theme);
        let coordinator = self.clone();
        tokio::spawn(async move { coordinator.finish_rebuild(rebuild).await })
    }

    /// Rebuild every rendered, enabled mount.
    ///
    /// Covers both widget kinds. Mounts still showing fallback content are
    /// left alone.
    pub async fn rebuild_all(&self, theme: Theme) -> ScanReport {
        let rebuild = self.begin_rebuild(theme);
        self.finish_rebuild(rebuild).await
    }

    /// Claim a rebuild of every live widget without doing any I/O.
    pub fn begin_rebuild(&self, theme: Theme) -> ThemeRebuild {
        let page_theme = self.session.current_theme();
        if page_theme != theme {
            debug!(
                "Theme change to {} but page carries {}, widgets follow the page",
                theme, page_theme
            );
        }

        let mut report = ScanReport::new();
        let mut pending = Vec::new();
        for mount in self.session.document().mounts() {
            match rebuild_skip(&mount) {
                Some(reason) => report.record_skip(&mount.id, reason),
                None => pending.push(self.session.prepare_mount(&mount)),
            }
        }

        ThemeRebuild {
            theme,
            report,
            pending,
        }
    }

    /// Run a claimed rebuild to completion.
    pub async fn finish_rebuild(&self, rebuild: ThemeRebuild) -> ScanReport {
        let ThemeRebuild {
            theme,
            mut report,
            pending,
        } = rebuild;
        debug!("Rebuilding {} widgets with {} theme", pending.len(), theme);

        let mount_ids: Vec<String> = pending.iter().map(|p| p.mount_id().to_string()).collect();
        let results = join_all(
            pending
                .into_iter()
                .map(|pending| self.session.finish(pending)),
        )
        .await;
        for (mount_id, result) in mount_ids.iter().zip(results) {
            match result {
                Ok(outcome) => report.record_outcome(mount_id, outcome),
                Err(e) => {
                    error!("Failed to rebuild widget in {}: {}", mount_id, e);
                    report.record_error(mount_id, e.category(), e.to_string());
                }
            }
        }

        info!(
            "Theme rebuild complete: {} rebuilt, {} skipped, {} failed",
            report.rendered_count(),
            report.skipped_count(),
            report.failed_count()
        );
        report
    }
}

fn rebuild_skip(mount: &WidgetMount) -> Option<SkipReason> {
    if !mount.use_external_widget {
        return Some(SkipReason::FeatureDisabled);
    }
    if !mount.rendered {
        return Some(SkipReason::NotRendered);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element, ATTR_TICKER, ATTR_WIDGET_THEME};
    use crate::memory::{InMemoryDocument, MountNode};
    use crate::report::{MountOutcome, RenderOutcome};
    use crate::scanner::WidgetScanner;
    use crate::test_support::{script_config, session_with, MockLookup};
    use crate::theme::ROOT_THEME_ATTR;

    #[tokio::test]
    async fn test_theme_flip_rebuilds_every_live_widget() {
        let lookup = MockLookup::new();
        lookup.venue("AAPL", "NASDAQ");
        lookup.venue("GDX", "ARCA");
        let doc = Arc::new(InMemoryDocument::new());
        doc.set_root_attribute(ROOT_THEME_ATTR, "light");
        doc.insert_mount(MountNode::compact("overview-aapl", "AAPL"));
        doc.insert_mount(MountNode::advanced("calc-chart", "AAPL"));
        let session = session_with(&lookup, &doc);

        WidgetScanner::new(session.clone())
            .scan_and_initialize_all()
            .await;
        session.update_symbol("calc-chart", "GDX").await.unwrap();
        let calls_before = lookup.calls();

        doc.set_root_attribute(ROOT_THEME_ATTR, "dark");
        let report = ThemeCoordinator::new(session.clone())
            .on_theme_changed(Theme::Dark)
            .await
            .unwrap();

        assert_eq!(report.rendered_count(), 2);
        assert_eq!(lookup.calls(), calls_before);

        let compact = script_config(&doc, "overview-aapl");
        assert_eq!(compact["colorTheme"], "dark");
        assert_eq!(compact["symbol"], "NASDAQ:AAPL");
        let advanced = script_config(&doc, "calc-chart");
        assert_eq!(advanced["theme"], "dark");
        assert_eq!(advanced["symbol"], "AMEX:GDX");
        assert_eq!(
            doc.mount_attribute("calc-chart", ATTR_WIDGET_THEME).as_deref(),
            Some("dark")
        );
    }

    #[tokio::test]
    async fn test_fallback_and_unrendered_mounts_are_untouched() {
        let lookup = MockLookup::new();
        let fallback =
            vec![Element::new("img").with_attr("src", "https://finviz.com/chart.ashx?t=SPY")];
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(
            MountNode::compact("overview-spy", "SPY")
                .with_widget_disabled()
                .with_children(fallback.clone()),
        );
        doc.insert_mount(MountNode::compact("overview-msft", "MSFT"));
        let session = session_with(&lookup, &doc);

        let report = ThemeCoordinator::new(session)
            .rebuild_all(Theme::Dark)
            .await;

        assert_eq!(
            report.outcome("overview-spy"),
            Some(&MountOutcome::Skipped(SkipReason::FeatureDisabled))
        );
        assert_eq!(
            report.outcome("overview-msft"),
            Some(&MountOutcome::Skipped(SkipReason::NotRendered))
        );
        assert_eq!(doc.children("overview-spy").unwrap(), fallback);
        assert_eq!(doc.write_count("overview-msft"), 0);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_rapid_flips_leave_latest_theme() {
        let lookup = MockLookup::new();
        lookup.venue("AAPL", "NASDAQ");
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::compact("overview-aapl", "AAPL"));
        let session = session_with(&lookup, &doc);
        WidgetScanner::new(session.clone())
            .scan_and_initialize_all()
            .await;

        let coordinator = ThemeCoordinator::new(session);
        let mut handles = Vec::new();
        for theme in [Theme::Dark, Theme::Light, Theme::Dark] {
            doc.set_root_attribute(ROOT_THEME_ATTR, theme.as_str());
            handles.push(coordinator.on_theme_changed(theme));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(script_config(&doc, "overview-aapl")["colorTheme"], "dark");
        assert_eq!(doc.children("overview-aapl").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_later_flip_supersedes_earlier_one_finishing_last() {
        let lookup = MockLookup::new();
        lookup.venue("AAPL", "NASDAQ");
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::compact("overview-aapl", "AAPL"));
        let session = session_with(&lookup, &doc);
        WidgetScanner::new(session.clone())
            .scan_and_initialize_all()
            .await;
        let coordinator = ThemeCoordinator::new(session);

        doc.set_root_attribute(ROOT_THEME_ATTR, "dark");
        let to_dark = coordinator.begin_rebuild(Theme::Dark);
        doc.set_root_attribute(ROOT_THEME_ATTR, "light");
        let to_light = coordinator.begin_rebuild(Theme::Light);

        let light = coordinator.finish_rebuild(to_light).await;
        let dark = coordinator.finish_rebuild(to_dark).await;

        assert_eq!(light.rendered_count(), 1);
        assert_eq!(
            dark.outcome("overview-aapl"),
            Some(&MountOutcome::Superseded)
        );
        assert_eq!(script_config(&doc, "overview-aapl")["colorTheme"], "light");
    }

    #[tokio::test]
    async fn test_flip_during_initial_scan_reaches_the_new_widget() {
        let lookup = MockLookup::new();
        lookup.venue("AAPL", "NASDAQ");
        let gate = lookup.gate("AAPL");
        let doc = Arc::new(InMemoryDocument::new());
        doc.set_root_attribute(ROOT_THEME_ATTR, "light");
        doc.insert_mount(MountNode::compact("overview-aapl", "AAPL"));
        let session = session_with(&lookup, &doc);
        let scanner = WidgetScanner::new(session.clone());
        let coordinator = ThemeCoordinator::new(session);

        // The page goes dark while the scan's lookup is still in flight.
        let (scan, rebuild) = tokio::join!(scanner.scan_and_initialize_all(), async {
            doc.set_root_attribute(ROOT_THEME_ATTR, "dark");
            let report = coordinator.rebuild_all(Theme::Dark).await;
            gate.notify_one();
            report
        });

        assert_eq!(
            rebuild.outcome("overview-aapl"),
            Some(&MountOutcome::Skipped(SkipReason::NotRendered))
        );
        assert_eq!(scan.rendered(), vec!["overview-aapl"]);
        assert_eq!(script_config(&doc, "overview-aapl")["colorTheme"], "dark");
        assert_eq!(
            doc.mount_attribute("overview-aapl", ATTR_WIDGET_THEME).as_deref(),
            Some("dark")
        );
    }

    #[tokio::test]
    async fn test_stale_rebuild_is_superseded_by_symbol_update() {
        let lookup = MockLookup::new();
        lookup.venue("MSFT", "NASDAQ");
        lookup.venue("SPY", "NYSE");
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::advanced("calc-chart", "MSFT"));
        let session = session_with(&lookup, &doc);
        session.update_symbol("calc-chart", "MSFT").await.unwrap();

        // The rebuild reads an uncached, gated ticker so the update lands first.
        doc.set_attribute("calc-chart", ATTR_TICKER, "QQQ").unwrap();
        lookup.venue("QQQ", "NASDAQ");
        let gate = lookup.gate("QQQ");
        let coordinator = ThemeCoordinator::new(session.clone());

        let (rebuild, update) = tokio::join!(coordinator.rebuild_all(Theme::Dark), async {
            let outcome = session.update_symbol("calc-chart", "SPY").await;
            gate.notify_one();
            outcome
        });

        assert_eq!(
            rebuild.outcome("calc-chart"),
            Some(&MountOutcome::Superseded)
        );
        assert!(matches!(update.unwrap(), RenderOutcome::Rendered(_)));
        assert_eq!(script_config(&doc, "calc-chart")["symbol"], "NYSE:SPY");
    }
}
