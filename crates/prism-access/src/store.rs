//! Role membership store
//!
//! Provides [`RoleStore`], the per-instance record of role membership and
//! admin-of relationships. Mutations are idempotent and authorization fails
//! closed.

use indexmap::{IndexMap, IndexSet};
use prism_types::{Address, RoleId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AccessError;

/// Membership record for one role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleMembers {
    /// Role whose members may grant/revoke this role
    pub admin: RoleId,
    /// Current members, in grant order
    pub members: IndexSet<Address>,
}

impl RoleMembers {
    fn new(admin: RoleId) -> Self {
        Self {
            admin,
            members: IndexSet::new(),
        }
    }
}

/// Per-instance role membership and admin-of relationships
///
/// Roles exist implicitly: an unknown role has no members and is
/// administered by [`RoleId::DEFAULT`]. Admin assignments may form chains of
/// arbitrary depth; each check consults only the direct admin role plus the
/// default role. The default role's admin is always itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleStore {
    roles: IndexMap<RoleId, RoleMembers>,
}

impl RoleStore {
    /// Create an empty store with no members in any role
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `admin` as the sole member of the default role
    ///
    /// Used at instance construction: whoever creates the instance starts
    /// out able to administer every role.
    #[must_use]
    pub fn with_admin(admin: Address) -> Self {
        let mut store = Self::new();
        store
            .roles
            .entry(RoleId::DEFAULT)
            .or_insert_with(|| RoleMembers::new(RoleId::DEFAULT))
            .members
            .insert(admin);
        store
    }

    /// Check membership; pure lookup
    #[inline]
    #[must_use]
    pub fn has_role(&self, role: RoleId, account: Address) -> bool {
        self.roles
            .get(&role)
            .is_some_and(|r| r.members.contains(&account))
    }

    /// The role that administers `role`
    ///
    /// Defaults to [`RoleId::DEFAULT`] for roles never configured; the
    /// default role always administers itself.
    #[inline]
    #[must_use]
    pub fn role_admin(&self, role: RoleId) -> RoleId {
        if role.is_default() {
            return RoleId::DEFAULT;
        }
        self.roles
            .get(&role)
            .map_or(RoleId::DEFAULT, |r| r.admin)
    }

    /// Check whether `caller` may grant/revoke `role`
    ///
    /// True iff the caller is a member of the role's admin role or of the
    /// default role.
    #[must_use]
    pub fn is_authorized(&self, caller: Address, role: RoleId) -> bool {
        self.has_role(self.role_admin(role), caller) || self.has_role(RoleId::DEFAULT, caller)
    }

    /// Fail-closed authorization gate for grant/revoke paths
    ///
    /// # Errors
    /// Returns [`AccessError::Unauthorized`] unless [`Self::is_authorized`]
    /// holds.
    pub fn ensure_can_administer(
        &self,
        caller: Address,
        role: RoleId,
    ) -> Result<(), AccessError> {
        if self.is_authorized(caller, role) {
            Ok(())
        } else {
            Err(AccessError::Unauthorized {
                role,
                account: caller,
            })
        }
    }

    /// Configure the admin role of `role`
    ///
    /// Requires the caller to currently administer `role`. The default
    /// role's admin is fixed to itself; re-assigning it is a no-op.
    ///
    /// # Errors
    /// Returns [`AccessError::Unauthorized`] if the caller may not
    /// administer `role`.
    pub fn set_role_admin(
        &mut self,
        caller: Address,
        role: RoleId,
        admin: RoleId,
    ) -> Result<(), AccessError> {
        self.ensure_can_administer(caller, role)?;
        if role.is_default() {
            return Ok(());
        }
        self.roles
            .entry(role)
            .or_insert_with(|| RoleMembers::new(admin))
            .admin = admin;
        Ok(())
    }

    /// Grant `role` to `account`; idempotent
    ///
    /// Returns `true` if the account was newly added.
    ///
    /// # Errors
    /// Returns [`AccessError::Unauthorized`] if the caller may not
    /// administer `role`.
    pub fn grant(
        &mut self,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<bool, AccessError> {
        self.ensure_can_administer(caller, role)?;
        let admin = self.role_admin(role);
        let added = self
            .roles
            .entry(role)
            .or_insert_with(|| RoleMembers::new(admin))
            .members
            .insert(account);
        if added {
            debug!(%role, %account, granted_by = %caller, "role granted");
        }
        Ok(added)
    }

    /// Revoke `role` from `account`; idempotent
    ///
    /// Returns `true` if the account was actually removed.
    ///
    /// # Errors
    /// Returns [`AccessError::Unauthorized`] if the caller may not
    /// administer `role`.
    pub fn revoke(
        &mut self,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<bool, AccessError> {
        self.ensure_can_administer(caller, role)?;
        let removed = self
            .roles
            .get_mut(&role)
            .is_some_and(|r| r.members.shift_remove(&account));
        if removed {
            debug!(%role, %account, revoked_by = %caller, "role revoked");
        }
        Ok(removed)
    }

    /// Self-service removal of the caller from `role`; always permitted,
    /// idempotent
    ///
    /// Returns `true` if the caller was actually removed.
    pub fn renounce(&mut self, caller: Address, role: RoleId) -> bool {
        let removed = self
            .roles
            .get_mut(&role)
            .is_some_and(|r| r.members.shift_remove(&caller));
        if removed {
            debug!(%role, account = %caller, "role renounced");
        }
        removed
    }

    /// Current members of `role`, in grant order
    #[must_use]
    pub fn members(&self, role: RoleId) -> Vec<Address> {
        self.roles
            .get(&role)
            .map(|r| r.members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// All roles that have been touched (configured or ever granted)
    pub fn roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.roles.keys().copied()
    }
}
