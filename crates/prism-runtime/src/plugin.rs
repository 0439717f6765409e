//! Plugin trait and shared code registry
//!
//! [`Plugin`] is the trait every installable module implements; the
//! [`CodeRegistry`] is the shared "deployed code" space standing in for the
//! substrate's global contract space. Code lives at a deterministic address
//! derived from its name; instances resolve route targets here at dispatch
//! time and execute the resolved code against their own state.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use prism_types::{Address, Selector};
use serde_json::Value;
use tracing::info;

use crate::error::RuntimeError;
use crate::state::InstanceState;

static INIT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::from_signature("init(bytes)"));
static ON_DEPLOY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::from_signature("onDeploy(address,bytes32)"));

/// Selector used to invoke one-time initializers after an update batch
#[inline]
#[must_use]
pub fn init_selector() -> Selector {
    *INIT_SELECTOR
}

/// Selector used to invoke post-deploy callbacks
#[inline]
#[must_use]
pub fn on_deploy_selector() -> Selector {
    *ON_DEPLOY_SELECTOR
}

/// Everything a plugin sees for one invocation
///
/// The plugin supplies the code; the instance supplies the storage. `state`
/// is a scratch copy of the instance state; the dispatcher commits it only
/// if the call returns `Ok`, so a failing plugin can never leave a partial
/// write behind.
pub struct CallContext<'a> {
    /// Address of the instance being executed against
    pub instance: Address,
    /// Account that made the call
    pub caller: Address,
    /// Selector the call arrived on
    pub selector: Selector,
    /// JSON-encoded request payload
    pub payload: Value,
    /// The instance's state (scratch copy; committed on success)
    pub state: &'a mut InstanceState,
    /// Code registry, for nested resolution (initializers, callbacks)
    pub code: &'a CodeRegistry,
}

/// An installable module
///
/// Implementations are stateless values behind `Arc`; all persistent data
/// belongs to the instance state handed in through [`CallContext`].
pub trait Plugin: Send + Sync {
    /// Stable name; the plugin's registry address derives from it
    fn name(&self) -> &str;

    /// Selectors this plugin answers
    fn selectors(&self) -> Vec<Selector>;

    /// Execute one call
    ///
    /// # Errors
    /// Any error aborts the whole dispatched operation; the instance state
    /// is left untouched.
    fn call(&self, ctx: CallContext<'_>) -> Result<Value, RuntimeError>;
}

/// Shared code space: `Address -> Arc<dyn Plugin>`
///
/// Addresses are content-ish: derived from the plugin name, so the same
/// plugin installs at the same address in every registry.
#[derive(Default)]
pub struct CodeRegistry {
    code: DashMap<Address, Arc<dyn Plugin>>,
}

impl CodeRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic address for a plugin name
    #[must_use]
    pub fn code_address(name: &str) -> Address {
        Address::derive(&[b"prism.code", name.as_bytes()])
    }

    /// Install a plugin at its derived address
    ///
    /// # Errors
    /// Returns [`RuntimeError::AlreadyInstalled`] if the address is occupied.
    pub fn install(&self, plugin: Arc<dyn Plugin>) -> Result<Address, RuntimeError> {
        let address = Self::code_address(plugin.name());
        match self.code.entry(address) {
            dashmap::Entry::Occupied(_) => Err(RuntimeError::AlreadyInstalled(address)),
            dashmap::Entry::Vacant(slot) => {
                info!(name = plugin.name(), %address, "plugin code installed");
                slot.insert(plugin);
                Ok(address)
            }
        }
    }

    /// Install a plugin unless its address is already occupied
    ///
    /// Returns the derived address either way. Used for shared singletons
    /// (built-ins, common test plugins).
    pub fn ensure_installed(&self, plugin: Arc<dyn Plugin>) -> Address {
        let address = Self::code_address(plugin.name());
        self.code.entry(address).or_insert(plugin);
        address
    }

    /// Resolve the code installed at `address`
    #[must_use]
    pub fn get(&self, address: Address) -> Option<Arc<dyn Plugin>> {
        self.code.get(&address).map(|p| Arc::clone(&p))
    }

    /// Check whether any code is installed at `address`
    #[inline]
    #[must_use]
    pub fn contains(&self, address: Address) -> bool {
        self.code.contains_key(&address)
    }

    /// Number of installed plugins
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Names and addresses of all installed plugins
    #[must_use]
    pub fn list(&self) -> Vec<(Address, String)> {
        self.code
            .iter()
            .map(|entry| (*entry.key(), entry.value().name().to_string()))
            .collect()
    }
}

impl std::fmt::Debug for CodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeRegistry")
            .field("installed", &self.code.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullPlugin;

    impl Plugin for NullPlugin {
        fn name(&self) -> &str {
            "prism.test.null"
        }

        fn selectors(&self) -> Vec<Selector> {
            vec![Selector::from_signature("null()")]
        }

        fn call(&self, _ctx: CallContext<'_>) -> Result<Value, RuntimeError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn install_derives_stable_address() {
        let registry = CodeRegistry::new();
        let address = registry.install(Arc::new(NullPlugin)).unwrap();
        assert_eq!(address, CodeRegistry::code_address("prism.test.null"));
        assert!(registry.contains(address));
        assert!(registry.get(address).is_some());
    }

    #[test]
    fn double_install_rejected() {
        let registry = CodeRegistry::new();
        registry.install(Arc::new(NullPlugin)).unwrap();
        let err = registry.install(Arc::new(NullPlugin)).unwrap_err();
        assert_eq!(err.reason(), "ALREADY_INSTALLED");
    }

    #[test]
    fn ensure_installed_is_idempotent() {
        let registry = CodeRegistry::new();
        let a = registry.ensure_installed(Arc::new(NullPlugin));
        let b = registry.ensure_installed(Arc::new(NullPlugin));
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn well_known_selectors_are_stable() {
        assert_eq!(init_selector(), Selector::from_signature("init(bytes)"));
        assert_ne!(init_selector(), on_deploy_selector());
    }
}
