//! Configuration payloads handed to the chart engine.
//!
//! The engine reads these as JSON from the text of its embed `<script>`.
//! Field names follow the engine's embedding contract, which is camelCase
//! for the mini overview and mostly snake_case for the advanced chart.

use serde::Serialize;

use chartsync_market_data::QualifiedSymbol;

use crate::settings::WidgetSettings;
use crate::theme::Theme;

/// Simple moving averages drawn on every advanced chart.
pub const SMA_PERIODS: [u32; 3] = [50, 100, 200];

const STUDY_SUFFIX: &str = "@tv-basicstudies";

/// Study identifiers for the advanced chart: one SMA per period plus volume.
pub fn default_studies() -> Vec<String> {
    SMA_PERIODS
        .iter()
        .map(|period| format!("MA{}{}", period, STUDY_SUFFIX))
        .chain(std::iter::once(format!("Volume{}", STUDY_SUFFIX)))
        .collect()
}

/// Mini symbol overview configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactWidgetConfig {
    pub symbol: String,
    pub width: String,
    pub height: String,
    pub locale: String,
    pub date_range: String,
    pub color_theme: Theme,
    pub is_transparent: bool,
    pub autosize: bool,
    pub large_chart_url: String,
}

impl CompactWidgetConfig {
    pub fn new(symbol: &QualifiedSymbol, theme: Theme, settings: &WidgetSettings) -> Self {
        Self {
            symbol: symbol.to_string(),
            width: "100%".to_string(),
            height: "100%".to_string(),
            locale: settings.locale.clone(),
            date_range: settings.date_range.clone(),
            color_theme: theme,
            is_transparent: false,
            autosize: true,
            large_chart_url: String::new(),
        }
    }
}

/// Advanced chart configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancedChartConfig {
    pub autosize: bool,
    pub symbol: String,
    pub interval: String,
    pub timezone: String,
    pub theme: Theme,
    pub style: String,
    pub locale: String,
    pub toolbar_bg: String,
    pub enable_publishing: bool,
    pub allow_symbol_change: bool,
    pub hide_top_toolbar: bool,
    pub hide_side_toolbar: bool,
    #[serde(rename = "chartType")]
    pub chart_type: String,
    pub show_popup_button: bool,
    pub popup_width: String,
    pub popup_height: String,
    pub studies: Vec<String>,
    pub container_id: String,
    pub height: String,
    pub width: String,
}

impl AdvancedChartConfig {
    pub fn new(
        symbol: &QualifiedSymbol,
        theme: Theme,
        container_id: &str,
        settings: &WidgetSettings,
    ) -> Self {
        Self {
            autosize: true,
            symbol: symbol.to_string(),
            interval: settings.interval.clone(),
            timezone: settings.timezone.clone(),
            theme,
            style: settings.chart_style.clone(),
            locale: settings.locale.clone(),
            toolbar_bg: settings.toolbar_background(theme).to_string(),
            enable_publishing: false,
            allow_symbol_change: true,
            hide_top_toolbar: false,
            hide_side_toolbar: true,
            chart_type: "candlestick".to_string(),
            show_popup_button: true,
            popup_width: settings.popup_width.clone(),
            popup_height: settings.popup_height.clone(),
            studies: default_studies(),
            container_id: container_id.to_string(),
            height: settings.advanced_height.clone(),
            width: "100%".to_string(),
        }
    }
}

/// Either widget configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WidgetConfig {
    Compact(CompactWidgetConfig),
    Advanced(AdvancedChartConfig),
}

impl WidgetConfig {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Compact(c) => &c.symbol,
            Self::Advanced(c) => &c.symbol,
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            Self::Compact(c) => c.color_theme,
            Self::Advanced(c) => c.theme,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
