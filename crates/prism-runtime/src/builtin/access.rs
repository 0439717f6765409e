//! Built-in role store plugin

use once_cell::sync::Lazy;
use prism_types::{Address, RoleId, Selector};
use serde::Deserialize;
use serde_json::Value;

use crate::error::RuntimeError;
use crate::plugin::{CallContext, Plugin};

static GRANT: Lazy<Selector> = Lazy::new(|| Selector::from_signature("grantRole(bytes32,address)"));
static REVOKE: Lazy<Selector> =
    Lazy::new(|| Selector::from_signature("revokeRole(bytes32,address)"));
static RENOUNCE: Lazy<Selector> = Lazy::new(|| Selector::from_signature("renounceRole(bytes32)"));
static HAS_ROLE: Lazy<Selector> = Lazy::new(|| Selector::from_signature("hasRole(bytes32,address)"));
static ROLE_ADMIN: Lazy<Selector> = Lazy::new(|| Selector::from_signature("getRoleAdmin(bytes32)"));
static SET_ROLE_ADMIN: Lazy<Selector> =
    Lazy::new(|| Selector::from_signature("setRoleAdmin(bytes32,bytes32)"));

#[derive(Debug, Deserialize)]
struct RoleAccountRequest {
    role: RoleId,
    account: Address,
}

#[derive(Debug, Deserialize)]
struct RoleRequest {
    role: RoleId,
}

#[derive(Debug, Deserialize)]
struct RoleAdminRequest {
    role: RoleId,
    admin: RoleId,
}

/// Dispatched role store operations
///
/// Grant and revoke are gated by the role's admin role (or the default
/// role) exactly as in the typed API; renounce is self-service against
/// `ctx.caller`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPlugin;

impl AccessPlugin {
    /// Selector of `grantRole`
    #[inline]
    #[must_use]
    pub fn grant_selector() -> Selector {
        *GRANT
    }

    /// Selector of `revokeRole`
    #[inline]
    #[must_use]
    pub fn revoke_selector() -> Selector {
        *REVOKE
    }

    /// Selector of `renounceRole`
    #[inline]
    #[must_use]
    pub fn renounce_selector() -> Selector {
        *RENOUNCE
    }

    /// Selector of `hasRole`
    #[inline]
    #[must_use]
    pub fn has_role_selector() -> Selector {
        *HAS_ROLE
    }

    /// Selector of `getRoleAdmin`
    #[inline]
    #[must_use]
    pub fn role_admin_selector() -> Selector {
        *ROLE_ADMIN
    }

    /// Selector of `setRoleAdmin`
    #[inline]
    #[must_use]
    pub fn set_role_admin_selector() -> Selector {
        *SET_ROLE_ADMIN
    }
}

impl Plugin for AccessPlugin {
    fn name(&self) -> &str {
        "prism.builtin.access"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![
            Self::grant_selector(),
            Self::revoke_selector(),
            Self::renounce_selector(),
            Self::has_role_selector(),
            Self::role_admin_selector(),
            Self::set_role_admin_selector(),
        ]
    }

    fn call(&self, ctx: CallContext<'_>) -> Result<Value, RuntimeError> {
        if ctx.selector == Self::grant_selector() {
            let req: RoleAccountRequest = serde_json::from_value(ctx.payload)?;
            let added = ctx.state.roles.grant(ctx.caller, req.role, req.account)?;
            Ok(Value::Bool(added))
        } else if ctx.selector == Self::revoke_selector() {
            let req: RoleAccountRequest = serde_json::from_value(ctx.payload)?;
            let removed = ctx.state.roles.revoke(ctx.caller, req.role, req.account)?;
            Ok(Value::Bool(removed))
        } else if ctx.selector == Self::renounce_selector() {
            let req: RoleRequest = serde_json::from_value(ctx.payload)?;
            let removed = ctx.state.roles.renounce(ctx.caller, req.role);
            Ok(Value::Bool(removed))
        } else if ctx.selector == Self::has_role_selector() {
            let req: RoleAccountRequest = serde_json::from_value(ctx.payload)?;
            Ok(Value::Bool(ctx.state.roles.has_role(req.role, req.account)))
        } else if ctx.selector == Self::role_admin_selector() {
            let req: RoleRequest = serde_json::from_value(ctx.payload)?;
            Ok(serde_json::to_value(ctx.state.roles.role_admin(req.role))?)
        } else if ctx.selector == Self::set_role_admin_selector() {
            let req: RoleAdminRequest = serde_json::from_value(ctx.payload)?;
            ctx.state.roles.set_role_admin(ctx.caller, req.role, req.admin)?;
            Ok(Value::Null)
        } else {
            Err(RuntimeError::NoSuchOperation(ctx.selector))
        }
    }
}
