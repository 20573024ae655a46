//! In-memory [`Document`] implementation.
//!
//! Backs the snapshot tool and the test suite. Page fixtures deserialize
//! straight into [`PageState`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::dom::{Document, Element, WidgetMount, ATTR_KIND, ATTR_TICKER, ATTR_USE_WIDGET};
use crate::errors::{Result, WidgetError};

/// One mount element and its current content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountNode {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl MountNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Compact overview mount for a ticker.
    pub fn compact(id: impl Into<String>, ticker: &str) -> Self {
        Self::new(id).with_attribute(ATTR_TICKER, ticker)
    }

    /// Advanced chart mount for a ticker.
    pub fn advanced(id: impl Into<String>, ticker: &str) -> Self {
        Self::new(id)
            .with_attribute(ATTR_TICKER, ticker)
            .with_attribute(ATTR_KIND, "advanced")
    }

    /// Turn the widget feature flag off for this mount.
    pub fn with_widget_disabled(self) -> Self {
        self.with_attribute(ATTR_USE_WIDGET, "false")
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    fn snapshot(&self) -> WidgetMount {
        WidgetMount::from_parts(&self.id, &self.attributes, &self.children)
    }
}

/// Serializable page state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    #[serde(default)]
    pub root_attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub mounts: Vec<MountNode>,
}

#[derive(Debug, Default)]
struct DocumentInner {
    page: PageState,
    writes: HashMap<String, usize>,
}

/// Thread-safe in-memory page.
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    inner: Mutex<DocumentInner>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(page: PageState) -> Self {
        Self {
            inner: Mutex::new(DocumentInner {
                page,
                writes: HashMap::new(),
            }),
        }
    }

    /// Load a page fixture from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let page: PageState = serde_json::from_str(json)?;
        Ok(Self::from_state(page))
    }

    /// Lock the page, recovering from poison if necessary.
    ///
    /// Writes replace whole values, so a poisoned lock still guards a
    /// consistent page.
    fn lock(&self) -> MutexGuard<'_, DocumentInner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Document mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn set_root_attribute(&self, name: &str, value: &str) {
        self.lock()
            .page
            .root_attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_root_attribute(&self, name: &str) {
        self.lock().page.root_attributes.remove(name);
    }

    /// Add a mount, replacing any mount with the same id.
    pub fn insert_mount(&self, node: MountNode) {
        let mut inner = self.lock();
        inner.page.mounts.retain(|m| m.id != node.id);
        inner.page.mounts.push(node);
    }

    /// Remove a mount, as when its page fragment is swapped out.
    pub fn remove_mount(&self, id: &str) -> bool {
        let mut inner = self.lock();
        let before = inner.page.mounts.len();
        inner.page.mounts.retain(|m| m.id != id);
        inner.page.mounts.len() != before
    }

    pub fn children(&self, id: &str) -> Option<Vec<Element>> {
        self.lock()
            .page
            .mounts
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.children.clone())
    }

    pub fn mount_attribute(&self, id: &str, name: &str) -> Option<String> {
        self.lock()
            .page
            .mounts
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.attributes.get(name).cloned())
    }

    /// Number of subtree replacements applied to a mount.
    pub fn write_count(&self, id: &str) -> usize {
        self.lock().writes.get(id).copied().unwrap_or(0)
    }

    /// HTML of a mount's children.
    pub fn inner_html(&self, id: &str) -> Option<String> {
        self.children(id)
            .map(|children| children.iter().map(Element::to_html).collect())
    }

    pub fn snapshot(&self) -> PageState {
        self.lock().page.clone()
    }
}

impl Document for InMemoryDocument {
    fn mounts(&self) -> Vec<WidgetMount> {
        self.lock().page.mounts.iter().map(MountNode::snapshot).collect()
    }

    fn mount(&self, id: &str) -> Option<WidgetMount> {
        self.lock()
            .page
            .mounts
            .iter()
            .find(|m| m.id == id)
            .map(MountNode::snapshot)
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.lock().page.root_attributes.get(name).cloned()
    }

    fn set_attribute(&self, mount_id: &str, name: &str, value: &str) -> Result<()> {
        let mut inner = self.lock();
        let node = inner
            .page
            .mounts
            .iter_mut()
            .find(|m| m.id == mount_id)
            .ok_or_else(|| WidgetError::MountNotFound(mount_id.to_string()))?;
        node.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn replace_children(&self, mount_id: &str, children: Vec<Element>) -> Result<()> {
        let mut inner = self.lock();
        let node = inner
            .page
            .mounts
            .iter_mut()
            .find(|m| m.id == mount_id)
            .ok_or_else(|| WidgetError::MountNotFound(mount_id.to_string()))?;
        node.children = children;
        *inner.writes.entry(mount_id.to_string()).or_insert(0) += 1;
        Ok(())
    }
}
