//! Route update batches

use prism_types::{Address, Selector};
use serde::{Deserialize, Serialize};

/// What an update entry does to its selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    /// Bind unrouted selectors to the entry's target
    Add,
    /// Rebind already-routed selectors to the entry's target
    Replace,
    /// Clear bindings currently pointing at the entry's target
    Remove,
}

/// One entry of a route update batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntry {
    /// Implementing target the entry refers to
    pub target: Address,
    /// What to do with the selectors
    pub action: UpdateAction,
    /// Selectors affected, validated in order
    pub selectors: Vec<Selector>,
}

/// An ordered batch of route changes, applied atomically
///
/// Entries validate and apply in list order against a scratch copy of the
/// table; the first precondition violation discards the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteUpdate {
    /// Entries in application order
    pub entries: Vec<UpdateEntry>,
}

impl RouteUpdate {
    /// Create an empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an `Add` entry
    #[must_use]
    pub fn add(mut self, target: Address, selectors: Vec<Selector>) -> Self {
        self.entries.push(UpdateEntry {
            target,
            action: UpdateAction::Add,
            selectors,
        });
        self
    }

    /// Append a `Replace` entry
    #[must_use]
    pub fn replace(mut self, target: Address, selectors: Vec<Selector>) -> Self {
        self.entries.push(UpdateEntry {
            target,
            action: UpdateAction::Replace,
            selectors,
        });
        self
    }

    /// Append a `Remove` entry
    #[must_use]
    pub fn remove(mut self, target: Address, selectors: Vec<Selector>) -> Self {
        self.entries.push(UpdateEntry {
            target,
            action: UpdateAction::Remove,
            selectors,
        });
        self
    }

    /// Number of entries in the batch
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the batch has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
