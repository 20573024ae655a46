//! Dashboard session: the resolver, the page, and per-mount ordering.

use std::sync::Arc;

use log::{debug, info, warn};

use chartsync_market_data::{ExchangeResolver, TickerSymbol};

use crate::dom::{Document, WidgetKind, WidgetMount, ATTR_TICKER};
use crate::errors::{Result, WidgetError};
use crate::factory::WidgetFactory;
use crate::generation::{GenerationTracker, RenderTicket};
use crate::report::{RenderOutcome, SkipReason};
use crate::settings::WidgetSettings;
use crate::theme::{current_theme, Theme};

/// A rebuild that has claimed its place in the mount's order.
///
/// Produced synchronously by [`WidgetSession::prepare_mount`] and
/// [`WidgetSession::prepare_symbol_update`]; the lookup and the write happen
/// later in [`WidgetSession::finish`]. Requests are ordered by when they were
/// prepared, not by when they finish.
#[derive(Debug)]
pub struct PendingRender {
    mount_id: String,
    step: Step,
}

#[derive(Debug)]
enum Step {
    Skip(SkipReason),
    Render {
        ticker: String,
        kind: WidgetKind,
        ticket: RenderTicket,
    },
}

impl PendingRender {
    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    fn skip(mount_id: &str, reason: SkipReason) -> Self {
        Self {
            mount_id: mount_id.to_string(),
            step: Step::Skip(reason),
        }
    }
}

/// State shared by the scanner, the theme coordinator and the modal flow.
///
/// One session per page lifetime. The resolver (and so its cache) is
/// injected, so tests and embedders decide its scope.
pub struct WidgetSession {
    resolver: Arc<ExchangeResolver>,
    document: Arc<dyn Document>,
    factory: WidgetFactory,
    generations: GenerationTracker,
}

impl WidgetSession {
    pub fn new(
        resolver: Arc<ExchangeResolver>,
        document: Arc<dyn Document>,
        settings: WidgetSettings,
    ) -> Self {
        Self {
            resolver,
            document,
            factory: WidgetFactory::new(settings),
            generations: GenerationTracker::new(),
        }
    }

    pub fn resolver(&self) -> &ExchangeResolver {
        &self.resolver
    }

    pub fn document(&self) -> &dyn Document {
        self.document.as_ref()
    }

    pub fn current_theme(&self) -> Theme {
        current_theme(self.document.as_ref())
    }

    /// Resolve and build one mount.
    ///
    /// Honors the mount's feature flag and ticker attribute; the kind is taken
    /// from the mount as-is.
    pub async fn render_mount(&self, mount: &WidgetMount) -> Result<RenderOutcome> {
        self.finish(self.prepare_mount(mount)).await
    }

    /// Point a mount at a new ticker and rebuild it.
    ///
    /// Used by the position calculator when the user picks an instrument.
    /// Rapid successive picks race; only the last pick's widget is applied.
    pub async fn update_symbol(&self, mount_id: &str, ticker: &str) -> Result<RenderOutcome> {
        let pending = self.prepare_symbol_update(mount_id, ticker)?;
        self.finish(pending).await
    }

    /// Claim a rebuild of `mount` without doing any I/O.
    ///
    /// Supersedes every rebuild of the mount prepared before it.
    pub fn prepare_mount(&self, mount: &WidgetMount) -> PendingRender {
        if !mount.use_external_widget {
            debug!("Widget disabled for {}, keeping fallback content", mount.id);
            return PendingRender::skip(&mount.id, SkipReason::FeatureDisabled);
        }
        let Some(ticker) = mount.ticker.as_deref() else {
            warn!("Missing {} attribute on {}", ATTR_TICKER, mount.id);
            return PendingRender::skip(&mount.id, SkipReason::MissingTicker);
        };
        self.claim(&mount.id, ticker, mount.kind)
    }

    /// Validate a picked ticker, record it on the mount and claim a rebuild.
    ///
    /// An invalid ticker is rejected before the mount is touched, so the
    /// mount keeps describing the widget it shows.
    pub fn prepare_symbol_update(&self, mount_id: &str, ticker: &str) -> Result<PendingRender> {
        let mount = self
            .document
            .mount(mount_id)
            .ok_or_else(|| WidgetError::MountNotFound(mount_id.to_string()))?;

        if ticker.trim().is_empty() {
            warn!("Empty ticker for {}", mount_id);
            return Err(WidgetError::MissingTicker(mount_id.to_string()));
        }
        let ticker = TickerSymbol::parse(ticker)?;
        if !mount.use_external_widget {
            info!("Widget disabled for {}, symbol update skipped", mount_id);
            return Ok(PendingRender::skip(mount_id, SkipReason::FeatureDisabled));
        }

        self.document.set_attribute(mount_id, ATTR_TICKER, ticker.as_str())?;
        Ok(self.claim(mount_id, ticker.as_str(), mount.kind))
    }

    /// Run a prepared rebuild: resolve the ticker, then write the widget if no
    /// newer rebuild of the mount was prepared in the meantime.
    ///
    /// The theme is read from the page at write time, so a widget finishing
    /// after a theme switch still gets the new theme.
    pub async fn finish(&self, pending: PendingRender) -> Result<RenderOutcome> {
        let PendingRender { mount_id, step } = pending;
        let (ticker, kind, ticket) = match step {
            Step::Skip(reason) => return Ok(RenderOutcome::Skipped(reason)),
            Step::Render {
                ticker,
                kind,
                ticket,
            } => (ticker, kind, ticket),
        };

        let Some(symbol) = self.resolver.resolve(&ticker).await else {
            return Ok(RenderOutcome::Skipped(SkipReason::InvalidTicker {
                ticker: ticker.clone(),
            }));
        };

        let applied = self.generations.apply_if_current(&ticket, || {
            let theme = self.current_theme();
            self.factory
                .build(self.document.as_ref(), &mount_id, &symbol, theme, kind)
        });

        match applied {
            Some(Ok(())) => Ok(RenderOutcome::Rendered(symbol)),
            Some(Err(e)) => Err(e),
            None => {
                debug!(
                    "Discarding {} for {} (generation {} superseded)",
                    symbol,
                    mount_id,
                    ticket.generation()
                );
                Ok(RenderOutcome::Superseded)
            }
        }
    }

    fn claim(&self, mount_id: &str, ticker: &str, kind: WidgetKind) -> PendingRender {
        PendingRender {
            mount_id: mount_id.to_string(),
            step: Step::Render {
                ticker: ticker.to_string(),
                kind,
                ticket: self.generations.issue(mount_id),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ATTR_WIDGET_THEME;
    use crate::memory::{InMemoryDocument, MountNode};
    use crate::test_support::{script_config, session_with, MockLookup};
    use crate::theme::ROOT_THEME_ATTR;
    use chartsync_market_data::{FailureCategory, MarketDataError};

    #[tokio::test]
    async fn test_render_mount_builds_widget() {
        let lookup = MockLookup::new();
        lookup.venue("AAPL", "NASDAQ");
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::compact("overview-aapl", "AAPL"));
        let session = session_with(&lookup, &doc);

        let mount = doc.mount("overview-aapl").unwrap();
        let outcome = session.render_mount(&mount).await.unwrap();

        assert!(matches!(
            outcome,
            RenderOutcome::Rendered(ref s) if s.to_string() == "NASDAQ:AAPL"
        ));
        let config = script_config(&doc, "overview-aapl");
        assert_eq!(config["symbol"], "NASDAQ:AAPL");
        assert_eq!(config["colorTheme"], "light");
    }

    #[tokio::test]
    async fn test_render_mount_respects_feature_flag() {
        let lookup = MockLookup::new();
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::compact("overview-gdx", "GDX").with_widget_disabled());
        let session = session_with(&lookup, &doc);

        let mount = doc.mount("overview-gdx").unwrap();
        let outcome = session.render_mount(&mount).await.unwrap();

        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::FeatureDisabled));
        assert_eq!(doc.write_count("overview-gdx"), 0);
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_render_mount_invalid_ticker_builds_nothing() {
        let lookup = MockLookup::new();
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::compact("overview-bad", "NOT A TICKER"));
        let session = session_with(&lookup, &doc);

        let mount = doc.mount("overview-bad").unwrap();
        let outcome = session.render_mount(&mount).await.unwrap();

        assert!(matches!(
            outcome,
            RenderOutcome::Skipped(SkipReason::InvalidTicker { .. })
        ));
        assert_eq!(doc.write_count("overview-bad"), 0);
    }

    #[tokio::test]
    async fn test_update_symbol_rewrites_ticker_and_uses_current_theme() {
        let lookup = MockLookup::new();
        lookup.venue("GDX", "ARCA");
        let doc = Arc::new(InMemoryDocument::new());
        doc.set_root_attribute(ROOT_THEME_ATTR, "dark");
        doc.insert_mount(MountNode::advanced("calc-chart", "AAPL"));
        let session = session_with(&lookup, &doc);

        let outcome = session.update_symbol("calc-chart", " GDX ").await.unwrap();

        assert!(matches!(outcome, RenderOutcome::Rendered(ref s) if s.to_string() == "AMEX:GDX"));
        assert_eq!(doc.mount("calc-chart").unwrap().ticker.as_deref(), Some("GDX"));
        assert_eq!(
            doc.mount_attribute("calc-chart", ATTR_WIDGET_THEME).as_deref(),
            Some("dark")
        );
        let config = script_config(&doc, "calc-chart");
        assert_eq!(config["theme"], "dark");
        assert_eq!(config["symbol"], "AMEX:GDX");
    }

    #[tokio::test]
    async fn test_update_symbol_errors() {
        let lookup = MockLookup::new();
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::advanced("calc-chart", "AAPL"));
        let session = session_with(&lookup, &doc);

        assert!(matches!(
            session.update_symbol("missing", "AAPL").await,
            Err(WidgetError::MountNotFound(_))
        ));
        assert!(matches!(
            session.update_symbol("calc-chart", "  ").await,
            Err(WidgetError::MissingTicker(_))
        ));
        assert_eq!(lookup.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_symbol_disabled_mount() {
        let lookup = MockLookup::new();
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::advanced("calc-chart", "AAPL").with_widget_disabled());
        let session = session_with(&lookup, &doc);

        let outcome = session.update_symbol("calc-chart", "MSFT").await.unwrap();
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::FeatureDisabled));
        assert_eq!(doc.mount("calc-chart").unwrap().ticker.as_deref(), Some("AAPL"));
    }

    #[tokio::test]
    async fn test_stale_update_is_discarded() {
        let lookup = MockLookup::new();
        lookup.venue("MSFT", "NASDAQ");
        lookup.venue("SPY", "NYSE");
        let gate = lookup.gate("MSFT");
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::advanced("calc-chart", "AAPL"));
        let session = session_with(&lookup, &doc);

        // The MSFT lookup stalls until SPY has been picked and rendered.
        let (first, second) = tokio::join!(session.update_symbol("calc-chart", "MSFT"), async {
            let outcome = session.update_symbol("calc-chart", "SPY").await;
            gate.notify_one();
            outcome
        });

        assert_eq!(first.unwrap(), RenderOutcome::Superseded);
        assert!(matches!(
            second.unwrap(),
            RenderOutcome::Rendered(ref s) if s.to_string() == "NYSE:SPY"
        ));
        assert_eq!(doc.write_count("calc-chart"), 1);
        assert_eq!(script_config(&doc, "calc-chart")["symbol"], "NYSE:SPY");
        assert_eq!(doc.mount("calc-chart").unwrap().ticker.as_deref(), Some("SPY"));
    }

    #[tokio::test]
    async fn test_invalid_pick_keeps_the_live_widget_consistent() {
        let lookup = MockLookup::new();
        lookup.venue("AAPL", "NASDAQ");
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::advanced("calc-chart", "AAPL"));
        let session = session_with(&lookup, &doc);
        session.update_symbol("calc-chart", "AAPL").await.unwrap();

        let err = session.update_symbol("calc-chart", "BRK B").await.unwrap_err();
        assert!(matches!(
            err,
            WidgetError::MarketData(MarketDataError::InvalidTicker(ref t)) if t == "BRK B"
        ));
        assert_eq!(err.category(), FailureCategory::Input);
        assert_eq!(doc.mount("calc-chart").unwrap().ticker.as_deref(), Some("AAPL"));
        assert_eq!(doc.write_count("calc-chart"), 1);

        // The mount still names its widget, so a theme switch restyles it.
        doc.set_root_attribute(ROOT_THEME_ATTR, "dark");
        let rebuilt = session.render_mount(&doc.mount("calc-chart").unwrap()).await;

        assert!(matches!(
            rebuilt.unwrap(),
            RenderOutcome::Rendered(ref s) if s.to_string() == "NASDAQ:AAPL"
        ));
        let config = script_config(&doc, "calc-chart");
        assert_eq!(config["symbol"], "NASDAQ:AAPL");
        assert_eq!(config["theme"], "dark");
    }

    #[tokio::test]
    async fn test_prepare_order_decides_the_winner() {
        let lookup = MockLookup::new();
        lookup.venue("MSFT", "NASDAQ");
        lookup.venue("SPY", "NYSE");
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::advanced("calc-chart", "AAPL"));
        let session = session_with(&lookup, &doc);

        let first = session.prepare_symbol_update("calc-chart", "MSFT").unwrap();
        let second = session.prepare_symbol_update("calc-chart", "spy").unwrap();
        assert_eq!(doc.mount("calc-chart").unwrap().ticker.as_deref(), Some("SPY"));

        // Finishing out of order must not let the older pick win.
        let newer = session.finish(second).await.unwrap();
        let older = session.finish(first).await.unwrap();

        assert!(matches!(
            newer,
            RenderOutcome::Rendered(ref s) if s.to_string() == "NYSE:SPY"
        ));
        assert_eq!(older, RenderOutcome::Superseded);
        assert_eq!(doc.write_count("calc-chart"), 1);
        assert_eq!(script_config(&doc, "calc-chart")["symbol"], "NYSE:SPY");
    }

    #[tokio::test]
    async fn test_theme_is_read_when_the_widget_is_written() {
        let lookup = MockLookup::new();
        lookup.venue("AAPL", "NASDAQ");
        let gate = lookup.gate("AAPL");
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::compact("overview-aapl", "AAPL"));
        let session = session_with(&lookup, &doc);
        let mount = doc.mount("overview-aapl").unwrap();

        let (outcome, _) = tokio::join!(session.render_mount(&mount), async {
            doc.set_root_attribute(ROOT_THEME_ATTR, "dark");
            gate.notify_one();
        });

        assert!(matches!(outcome.unwrap(), RenderOutcome::Rendered(_)));
        assert_eq!(script_config(&doc, "overview-aapl")["colorTheme"], "dark");
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_nasdaq() {
        let lookup = MockLookup::new();
        let doc = Arc::new(InMemoryDocument::new());
        doc.insert_mount(MountNode::compact("overview-zzzz", "ZZZZ"));
        let session = session_with(&lookup, &doc);

        let mount = doc.mount("overview-zzzz").unwrap();
        let outcome = session.render_mount(&mount).await.unwrap();

        assert!(matches!(
            outcome,
            RenderOutcome::Rendered(ref s) if s.to_string() == "NASDAQ:ZZZZ"
        ));
        assert_eq!(session.resolver().cached_exchange("ZZZZ"), None);
    }
}
