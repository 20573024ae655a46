//! Document model seen by the widget layer.
//!
//! The dashboard page is reached only through the [`Document`] trait: the
//! widget layer enumerates mount points, reads root state, and swaps a
//! mount's children in a single call. It never creates or removes the mount
//! elements themselves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Ticker the mount should chart.
pub const ATTR_TICKER: &str = "data-tradingview-symbol";
/// Feature flag; the literal `false` keeps the static image fallback.
pub const ATTR_USE_WIDGET: &str = "data-use-tradingview";
/// Widget kind discriminator (`compact` when absent).
pub const ATTR_KIND: &str = "data-tradingview-kind";
/// Theme most recently baked into the mount's widget.
pub const ATTR_WIDGET_THEME: &str = "data-tradingview-theme";

/// Class carried by the element the chart engine renders into.
pub const WIDGET_TARGET_CLASS: &str = "tradingview-widget-container__widget";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// Mini symbol overview.
    #[default]
    Compact,
    /// Full candlestick chart, owned by the position calculator modal.
    Advanced,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Advanced => "advanced",
        }
    }

    /// Parse the kind attribute; anything but `advanced` is compact.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("advanced") => Self::Advanced,
            _ => Self::Compact,
        }
    }
}

/// Minimal element tree used for mount content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(mut self, class: &str) -> Self {
        let merged = match self.attributes.get("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.attributes.insert("class".to_string(), merged);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|part| part == class))
            .unwrap_or(false)
    }

    /// This element followed by all of its descendants, depth first.
    pub fn walk(&self) -> Vec<&Element> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }
        out.push('>');
        if let Some(text) = &self.text {
            if self.tag.eq_ignore_ascii_case("script") {
                // Script bodies are raw text; only a closing tag can break out.
                out.push_str(&text.replace("</", "<\\/"));
            } else {
                out.push_str(&escape_text(text));
            }
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Snapshot of one mount point's widget-relevant state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMount {
    pub id: String,
    pub ticker: Option<String>,
    pub kind: WidgetKind,
    pub use_external_widget: bool,
    /// Whether the mount currently holds engine-rendered widget content.
    pub rendered: bool,
}

impl WidgetMount {
    /// Build a snapshot from a mount element's attributes and children.
    pub fn from_parts(
        id: &str,
        attributes: &BTreeMap<String, String>,
        children: &[Element],
    ) -> Self {
        let ticker = attributes
            .get(ATTR_TICKER)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let use_external_widget = attributes
            .get(ATTR_USE_WIDGET)
            .map(|v| v.trim() != "false")
            .unwrap_or(true);
        let kind = WidgetKind::from_attribute(attributes.get(ATTR_KIND).map(String::as_str));
        let rendered = children
            .iter()
            .flat_map(|c| c.walk())
            .any(|e| e.has_class(WIDGET_TARGET_CLASS));

        Self {
            id: id.to_string(),
            ticker,
            kind,
            use_external_widget,
            rendered,
        }
    }
}

/// Access to the dashboard page.
///
/// Implementations must apply [`replace_children`](Document::replace_children)
/// atomically: observers see either the old subtree or the new one, never a
/// cleared or half-built mount.
pub trait Document: Send + Sync {
    /// All mount points currently present on the page.
    fn mounts(&self) -> Vec<WidgetMount>;

    /// A single mount point by id.
    fn mount(&self, id: &str) -> Option<WidgetMount>;

    /// Attribute of the document root element (e.g. `data-theme`).
    fn root_attribute(&self, name: &str) -> Option<String>;

    /// Set an attribute on a mount element.
    fn set_attribute(&self, mount_id: &str, name: &str, value: &str) -> Result<()>;

    /// Replace all children of a mount element in one step.
    fn replace_children(&self, mount_id: &str, children: Vec<Element>) -> Result<()>;
}
