//! The PRISM instance
//!
//! Provides [`Instance`]: one route table, one role store, one storage map,
//! and the dispatcher that ties them to installable plugin code.
//!
//! Every state-mutating entry point stages its work on a scratch clone of
//! [`InstanceState`](crate::InstanceState) and commits it in a single
//! assignment under the write lock. The substrate model is one serialized
//! call at a time per instance; nested calls (initializers, self-
//! modification through the dispatcher) run inside the outer call's scratch
//! copy, so aborting the outer call undoes all nested effects.

use std::sync::Arc;

use parking_lot::RwLock;
use prism_access::update_role;
use prism_routing::{RouteGroup, RouteUpdate};
use prism_types::{Address, RoleId, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::builtin::Builtins;
use crate::error::RuntimeError;
use crate::ops;
use crate::plugin::CodeRegistry;
use crate::state::InstanceState;

/// One-time initializer accompanying a route update batch
///
/// Invoked once, in the instance's state context, immediately after the
/// batch applies; its failure discards batch and initializer together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initializer {
    /// Code to invoke (resolved in the code registry, not the route table)
    pub target: Address,
    /// JSON payload handed to the initializer
    pub payload: Value,
}

/// A long-lived, upgradeable object
///
/// Identity is its address; state is private to the instance; code is
/// resolved per call through the shared [`CodeRegistry`].
pub struct Instance {
    address: Address,
    code: Arc<CodeRegistry>,
    state: RwLock<InstanceState>,
}

impl Instance {
    /// Create an instance with its built-in plugins routed and `admin`
    /// holding the default and update roles
    ///
    /// Mirrors direct construction on the substrate: whoever creates the
    /// instance starts out able to administer and upgrade it, and is
    /// expected to renounce whatever it does not keep.
    ///
    /// # Errors
    /// Fails only if the built-in route sets collide, which would mean two
    /// built-ins share a selector.
    pub fn new(
        address: Address,
        code: Arc<CodeRegistry>,
        builtins: &Builtins,
        admin: Address,
    ) -> Result<Self, RuntimeError> {
        let mut state = InstanceState::with_admin(admin);
        state.roles.grant(admin, update_role(), admin)?;
        state.routes.apply(&builtins.route_update())?;

        info!(%address, %admin, "instance created");
        Ok(Self {
            address,
            code,
            state: RwLock::new(state),
        })
    }

    /// The instance's address
    #[inline]
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Run a closure against a scratch copy of the state, committing it
    /// only on success.
    fn transact<T>(
        &self,
        f: impl FnOnce(&mut InstanceState) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let mut guard = self.state.write();
        let mut scratch = guard.clone();
        let out = f(&mut scratch)?;
        *guard = scratch;
        Ok(out)
    }

    // ---- dispatcher ----

    /// Resolve `selector` against the route table and execute the target's
    /// code against this instance's state
    ///
    /// Unrouted selectors fall back to the default fallback target if one is
    /// set. Execution is all-or-nothing: state mutations made by the plugin
    /// are visible only if it returns `Ok`.
    ///
    /// # Errors
    /// [`RuntimeError::NoSuchOperation`] on a miss with no fallback,
    /// [`RuntimeError::MissingCode`] if the target has no installed code,
    /// otherwise whatever the plugin raised (discarding its writes).
    pub fn dispatch(
        &self,
        caller: Address,
        selector: Selector,
        payload: Value,
    ) -> Result<Value, RuntimeError> {
        let mut guard = self.state.write();
        let target = guard
            .routes
            .target_of(selector)
            .or_else(|| guard.fallback())
            .ok_or(RuntimeError::NoSuchOperation(selector))?;
        let plugin = self
            .code
            .get(target)
            .ok_or(RuntimeError::MissingCode(target))?;

        let mut scratch = guard.clone();
        let result = plugin.call(crate::plugin::CallContext {
            instance: self.address,
            caller,
            selector,
            payload,
            state: &mut scratch,
            code: &self.code,
        });
        match result {
            Ok(value) => {
                *guard = scratch;
                debug!(instance = %self.address, %selector, %target, "dispatch committed");
                Ok(value)
            }
            Err(err) => {
                warn!(
                    instance = %self.address,
                    %selector,
                    %target,
                    reason = err.reason(),
                    "dispatch aborted"
                );
                Err(err)
            }
        }
    }

    /// Execute installed code at `target` against this instance's state,
    /// bypassing the route table
    ///
    /// The direct-call counterpart of [`dispatch`](Self::dispatch), used for
    /// code the instance deliberately does not route: post-deploy callbacks
    /// and similar one-shot hooks. Same scratch-commit discipline.
    ///
    /// # Errors
    /// [`RuntimeError::MissingCode`] if nothing is installed at `target`,
    /// otherwise whatever the code raised (discarding its writes).
    pub fn call_code(
        &self,
        caller: Address,
        target: Address,
        selector: Selector,
        payload: Value,
    ) -> Result<Value, RuntimeError> {
        let plugin = self
            .code
            .get(target)
            .ok_or(RuntimeError::MissingCode(target))?;
        self.transact(|state| {
            plugin.call(crate::plugin::CallContext {
                instance: self.address,
                caller,
                selector,
                payload,
                state,
                code: &self.code,
            })
        })
    }

    // ---- plugin manager ----

    /// Apply a route update batch plus optional one-time initializer
    ///
    /// # Errors
    /// `Unauthorized` unless the caller holds the update role; any batch
    /// precondition violation or initializer failure discards everything.
    pub fn update(
        &self,
        caller: Address,
        update: &RouteUpdate,
        initializer: Option<&Initializer>,
    ) -> Result<(), RuntimeError> {
        self.transact(|state| {
            ops::apply_update(state, &self.code, self.address, caller, update, initializer)
        })
    }

    /// Set or clear the dispatcher's default fallback target
    ///
    /// # Errors
    /// `Unauthorized` unless the caller holds the update role.
    pub fn set_default_fallback(
        &self,
        caller: Address,
        target: Option<Address>,
    ) -> Result<(), RuntimeError> {
        self.transact(|state| ops::set_fallback(state, caller, target))
    }

    /// Current default fallback target
    #[must_use]
    pub fn default_fallback(&self) -> Option<Address> {
        self.state.read().fallback()
    }

    // ---- plugin viewer ----

    /// The route table grouped by target, exactly as of this call
    #[must_use]
    pub fn routes(&self) -> Vec<RouteGroup> {
        self.state.read().routes.routes()
    }

    /// Selectors currently routed to `target`
    #[must_use]
    pub fn selectors_of(&self, target: Address) -> Vec<Selector> {
        self.state.read().routes.selectors_of(target)
    }

    /// Target currently bound to `selector`, if any
    #[must_use]
    pub fn target_of(&self, selector: Selector) -> Option<Address> {
        self.state.read().routes.target_of(selector)
    }

    // ---- role store ----

    /// Grant `role` to `account`; idempotent
    ///
    /// # Errors
    /// `Unauthorized` unless the caller administers `role`.
    pub fn grant_role(
        &self,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<bool, RuntimeError> {
        self.transact(|state| Ok(state.roles.grant(caller, role, account)?))
    }

    /// Revoke `role` from `account`; idempotent
    ///
    /// # Errors
    /// `Unauthorized` unless the caller administers `role`.
    pub fn revoke_role(
        &self,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<bool, RuntimeError> {
        self.transact(|state| Ok(state.roles.revoke(caller, role, account)?))
    }

    /// Remove the caller from `role`; always permitted, idempotent
    pub fn renounce_role(&self, caller: Address, role: RoleId) -> bool {
        self.state.write().roles.renounce(caller, role)
    }

    /// Configure the admin role of `role`
    ///
    /// # Errors
    /// `Unauthorized` unless the caller currently administers `role`.
    pub fn set_role_admin(
        &self,
        caller: Address,
        role: RoleId,
        admin: RoleId,
    ) -> Result<(), RuntimeError> {
        self.transact(|state| Ok(state.roles.set_role_admin(caller, role, admin)?))
    }

    /// Check role membership; pure lookup
    #[must_use]
    pub fn has_role(&self, role: RoleId, account: Address) -> bool {
        self.state.read().roles.has_role(role, account)
    }

    /// The role administering `role`
    #[must_use]
    pub fn role_admin(&self, role: RoleId) -> RoleId {
        self.state.read().roles.role_admin(role)
    }

    // ---- storage introspection ----

    /// Read one storage value (cloned snapshot)
    #[must_use]
    pub fn storage_get(&self, key: &str) -> Option<Value> {
        self.state.read().get(key).cloned()
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
