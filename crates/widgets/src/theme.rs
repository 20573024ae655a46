//! Theme state reader.
//!
//! The theme module owns the root `data-theme` attribute; this module only
//! reads it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dom::Document;

/// Root attribute holding the active theme.
pub const ROOT_THEME_ATTR: &str = "data-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Interpret a root attribute value; absent or unknown means light.
    pub fn from_attribute(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Currently active theme of the document.
pub fn current_theme(document: &dyn Document) -> Theme {
    Theme::from_attribute(document.root_attribute(ROOT_THEME_ATTR).as_deref())
}
