//! Instance state
//!
//! Provides [`InstanceState`], the single state struct an instance owns and
//! hands (by mutable reference to a scratch copy) to whichever plugin the
//! dispatcher resolves. Making the state-passing explicit at the call
//! boundary is the foundational decoupling: plugins install and upgrade
//! without data migration because the data never lived in the plugin.

use indexmap::IndexMap;
use prism_access::RoleStore;
use prism_routing::RouteTable;
use prism_types::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything one instance persists
///
/// `Clone` is load-bearing: every mutating call runs against a clone of this
/// struct which replaces the original only on success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceState {
    /// Operation selector -> implementing target
    pub routes: RouteTable,
    /// Role membership and admin-of relationships
    pub roles: RoleStore,
    /// Dispatcher fallback target for unrouted selectors
    fallback: Option<Address>,
    /// Keyed JSON storage shared by all plugins of this instance
    storage: IndexMap<String, Value>,
}

impl InstanceState {
    /// Create empty state with `admin` seeded into the default role
    #[must_use]
    pub fn with_admin(admin: Address) -> Self {
        Self {
            routes: RouteTable::new(),
            roles: RoleStore::with_admin(admin),
            fallback: None,
            storage: IndexMap::new(),
        }
    }

    /// Current dispatcher fallback target
    #[inline]
    #[must_use]
    pub fn fallback(&self) -> Option<Address> {
        self.fallback
    }

    /// Set or clear the dispatcher fallback target
    #[inline]
    pub fn set_fallback(&mut self, target: Option<Address>) {
        self.fallback = target;
    }

    /// Read a storage value
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.storage.get(key)
    }

    /// Write a storage value
    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.storage.insert(key.into(), value);
    }

    /// Remove a storage value, returning it if present
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.storage.shift_remove(key)
    }

    /// All storage keys, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.storage.keys().map(String::as_str)
    }
}
