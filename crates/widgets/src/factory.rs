//! Widget construction.
//!
//! The chart engine bakes the theme into a widget when it is first built and
//! offers no way to change it afterwards, so every (re)build composes a fresh
//! subtree and swaps it in whole.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use log::info;

use chartsync_market_data::QualifiedSymbol;

use crate::config::{AdvancedChartConfig, CompactWidgetConfig, WidgetConfig};
use crate::dom::{Document, Element, WidgetKind, ATTR_WIDGET_THEME, WIDGET_TARGET_CLASS};
use crate::errors::Result;
use crate::settings::WidgetSettings;
use crate::theme::Theme;

/// Wrapper class around a compact widget.
pub const WIDGET_CONTAINER_CLASS: &str = "tradingview-widget-container";
/// Prefix of the element id an advanced chart renders into.
pub const ADVANCED_ID_PREFIX: &str = "tradingview_chart_widget_";

/// Builds widget subtrees and writes them into mounts.
pub struct WidgetFactory {
    settings: WidgetSettings,
    sequence: AtomicU64,
}

impl Default for WidgetFactory {
    fn default() -> Self {
        Self::new(WidgetSettings::default())
    }
}

impl WidgetFactory {
    pub fn new(settings: WidgetSettings) -> Self {
        Self {
            settings,
            sequence: AtomicU64::new(0),
        }
    }

    /// Fresh id for an advanced chart target.
    ///
    /// The engine keys widgets by container id, so reusing an id can make it
    /// attach to a stale instance. Millisecond time alone can repeat within
    /// one tick; the per-factory sequence makes every id distinct.
    pub fn next_container_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}{}_{}",
            ADVANCED_ID_PREFIX,
            Utc::now().timestamp_millis(),
            seq
        )
    }

    /// Configuration for a widget of the given kind.
    pub fn configure(
        &self,
        symbol: &QualifiedSymbol,
        theme: Theme,
        kind: WidgetKind,
    ) -> WidgetConfig {
        match kind {
            WidgetKind::Compact => {
                WidgetConfig::Compact(CompactWidgetConfig::new(symbol, theme, &self.settings))
            }
            WidgetKind::Advanced => WidgetConfig::Advanced(AdvancedChartConfig::new(
                symbol,
                theme,
                &self.next_container_id(),
                &self.settings,
            )),
        }
    }

    /// Compose the mount children for a widget, without touching the page.
    pub fn compose(
        &self,
        symbol: &QualifiedSymbol,
        theme: Theme,
        kind: WidgetKind,
    ) -> Result<Vec<Element>> {
        self.children_for(&self.configure(symbol, theme, kind))
    }

    fn children_for(&self, config: &WidgetConfig) -> Result<Vec<Element>> {
        let payload = config.to_json()?;

        let children = match config {
            WidgetConfig::Compact(_) => {
                let script = embed_script(&self.settings.compact_script_url, payload);
                vec![Element::new("div")
                    .with_class(WIDGET_CONTAINER_CLASS)
                    .with_child(Element::new("div").with_class(WIDGET_TARGET_CLASS))
                    .with_child(script)]
            }
            WidgetConfig::Advanced(advanced) => {
                let target = Element::new("div")
                    .with_id(advanced.container_id.clone())
                    .with_class(WIDGET_TARGET_CLASS);
                let script = embed_script(&self.settings.advanced_script_url, payload);
                vec![target, script]
            }
        };

        Ok(children)
    }

    /// Replace a mount's content with a freshly built widget.
    ///
    /// Idempotent in structure: the previous subtree is discarded, so repeated
    /// builds never accumulate widgets.
    pub fn build(
        &self,
        document: &dyn Document,
        mount_id: &str,
        symbol: &QualifiedSymbol,
        theme: Theme,
        kind: WidgetKind,
    ) -> Result<()> {
        let config = self.configure(symbol, theme, kind);
        let children = self.children_for(&config)?;
        document.replace_children(mount_id, children)?;
        document.set_attribute(mount_id, ATTR_WIDGET_THEME, config.theme().as_str())?;
        info!(
            "Initialized {} widget for {} in {} ({} theme)",
            kind.as_str(),
            config.symbol(),
            mount_id,
            config.theme()
        );
        Ok(())
    }
}

fn embed_script(src: &str, payload: String) -> Element {
    Element::new("script")
        .with_attr("type", "text/javascript")
        .with_attr("src", src)
        .with_attr("async", "")
        .with_text(payload)
}
