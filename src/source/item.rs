//! The record type shared by every endpoint.
//!
//! The poller treats items as opaque: it never looks inside them, it only
//! replaces one [`Snapshot`] with the next.  The accessors below exist for
//! the dashboard, which needs a one-line rendering of each record.
//!
//! ## For contributors
//!
//! The app server returns configuration objects (`SweepConfig`,
//! `TensorboardConfig`, `DataConfig`) as plain JSON.  Rather than mirroring
//! their schemas, [`Item`] keeps the raw object and picks out a handful of
//! well-known fields when asked.  An unknown field layout still renders, just
//! with fewer columns.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

/// The full published value for one endpoint.
///
/// Cheap to clone: readers share one allocation per publish.
pub type Snapshot = Arc<Vec<Item>>;

/// An empty snapshot, the value of every channel before its first fetch.
pub fn empty_snapshot() -> Snapshot {
    Arc::new(Vec::new())
}

/// A single record returned by the app server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Item(Value);

impl Item {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw JSON value.
    #[cfg(test)]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Identifier: the first present of `sweep_id`, `name`, `id`.
    pub fn id(&self) -> Option<String> {
        self.first_of(&["sweep_id", "name", "id"])
    }

    /// Lifecycle state: the first present of `stage`, `desired_state`,
    /// `status`.
    pub fn status(&self) -> Option<String> {
        self.first_of(&["stage", "desired_state", "status"])
    }

    /// A short per-kind description.
    ///
    /// * sweeps: `trials_done/n_trials trials`
    /// * tensorboards: the dashboard `url`
    /// * data mounts: `source -> mount_path`
    pub fn summary(&self) -> Option<String> {
        if let (Some(done), Some(total)) = (self.field("trials_done"), self.field("n_trials")) {
            return Some(format!("{done}/{total} trials"));
        }
        if let (Some(source), Some(mount)) = (self.field("source"), self.field("mount_path")) {
            return Some(format!("{source} -> {mount}"));
        }
        self.field("url")
    }

    fn first_of(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.field(name))
    }

    /// A scalar field rendered as text.  Nulls, arrays and objects are
    /// treated as absent.
    fn field(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
