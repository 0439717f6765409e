//! Instance seeds
//!
//! An [`InstanceSeed`] captures everything a deployment needs up front, so
//! the same seed always produces the same instance. Only the salt
//! participates in address derivation; grants, routes, and callbacks shape
//! the bootstrapped state, never the identity.

use prism_routing::RouteUpdate;
use prism_runtime::Initializer;
use prism_types::{Address, RoleId, Salt};
use serde::{Deserialize, Serialize};

/// One role configured at bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Role being configured
    pub role: RoleId,
    /// Admin role; `None` keeps the default (`RoleId::DEFAULT`)
    #[serde(default)]
    pub admin: Option<RoleId>,
    /// Accounts granted membership
    #[serde(default)]
    pub members: Vec<Address>,
}

/// Complete deployment recipe for one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSeed {
    /// Address-derivation input; the only seed field identity depends on
    pub salt: Salt,
    /// Roles configured during bootstrap, in order
    #[serde(default)]
    pub role_grants: Vec<RoleGrant>,
    /// Initial route batch applied during bootstrap
    #[serde(default)]
    pub update: RouteUpdate,
    /// One-time initializer accompanying the initial batch
    #[serde(default)]
    pub initializer: Option<Initializer>,
    /// Post-deploy callback code, invoked against the new instance's state
    #[serde(default)]
    pub callback: Option<Address>,
}

impl InstanceSeed {
    /// Start a seed from its salt
    #[must_use]
    pub fn new(salt: Salt) -> Self {
        Self {
            salt,
            role_grants: Vec::new(),
            update: RouteUpdate::new(),
            initializer: None,
            callback: None,
        }
    }

    /// Configure a role: optional explicit admin plus initial members
    #[must_use]
    pub fn grant(mut self, role: RoleId, admin: Option<RoleId>, members: Vec<Address>) -> Self {
        self.role_grants.push(RoleGrant {
            role,
            admin,
            members,
        });
        self
    }

    /// Set the initial route batch
    #[must_use]
    pub fn with_update(mut self, update: RouteUpdate) -> Self {
        self.update = update;
        self
    }

    /// Attach a one-time initializer to the initial batch
    #[must_use]
    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = Some(initializer);
        self
    }

    /// Set the post-deploy callback target
    #[must_use]
    pub fn with_callback(mut self, target: Address) -> Self {
        self.callback = Some(target);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_types::Selector;
    use serde_json::json;

    #[test]
    fn builder_accumulates_the_full_recipe() {
        let target = Address::new([7; 20]);
        let role = RoleId::from_name("OPERATOR");
        let seed = InstanceSeed::new(Salt::from_label("seed"))
            .grant(role, None, vec![Address::new([1; 20])])
            .with_update(RouteUpdate::new().add(target, vec![Selector::new([1, 2, 3, 4])]))
            .with_initializer(Initializer {
                target,
                payload: json!({ "uri": "ipfs://x" }),
            })
            .with_callback(Address::new([9; 20]));

        assert_eq!(seed.role_grants.len(), 1);
        assert_eq!(seed.role_grants[0].admin, None);
        assert_eq!(seed.update.len(), 1);
        assert!(seed.initializer.is_some());
        assert_eq!(seed.callback, Some(Address::new([9; 20])));
    }

    #[test]
    fn seed_serde_round_trip() {
        let seed = InstanceSeed::new(Salt::from_label("round-trip"))
            .grant(RoleId::from_name("OPERATOR"), None, vec![]);
        let encoded = serde_json::to_string(&seed).unwrap();
        let decoded: InstanceSeed = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, seed);
    }
}
