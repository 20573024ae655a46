//! Widget presentation settings.

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

pub const COMPACT_SCRIPT_URL: &str =
    "https://s3.tradingview.com/external-embedding/embed-widget-mini-symbol-overview.js";
pub const ADVANCED_SCRIPT_URL: &str =
    "https://s3.tradingview.com/external-embedding/embed-widget-advanced-chart.js";

/// Values baked into every widget configuration besides symbol and theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetSettings {
    pub locale: String,
    /// Compact widget range (e.g. "12M").
    pub date_range: String,
    /// Advanced chart bar interval (e.g. "D").
    pub interval: String,
    pub timezone: String,
    /// Advanced chart style code; "1" is candles.
    pub chart_style: String,
    pub advanced_height: String,
    pub popup_width: String,
    pub popup_height: String,
    pub toolbar_bg_light: String,
    pub toolbar_bg_dark: String,
    pub compact_script_url: String,
    pub advanced_script_url: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            date_range: "12M".to_string(),
            interval: "D".to_string(),
            timezone: "Etc/UTC".to_string(),
            chart_style: "1".to_string(),
            advanced_height: "600".to_string(),
            popup_width: "1000".to_string(),
            popup_height: "650".to_string(),
            toolbar_bg_light: "#f1f3f6".to_string(),
            toolbar_bg_dark: "#2a2e39".to_string(),
            compact_script_url: COMPACT_SCRIPT_URL.to_string(),
            advanced_script_url: ADVANCED_SCRIPT_URL.to_string(),
        }
    }
}

impl WidgetSettings {
    pub fn toolbar_background(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.toolbar_bg_light,
            Theme::Dark => &self.toolbar_bg_dark,
        }
    }
}
