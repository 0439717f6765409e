//! The instance factory
//!
//! Derives instance addresses purely from deployment inputs, bootstraps each
//! instance as one atomic unit, and keeps the registry of what it deployed.
//! An instance becomes reachable only after every bootstrap step succeeded
//! and the factory has renounced its bootstrap roles.

use std::sync::Arc;

use dashmap::DashMap;
use prism_access::update_role;
use prism_runtime::{on_deploy_selector, Builtins, CodeRegistry, Instance};
use prism_types::{Address, RoleId, Salt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::error::FactoryError;
use crate::seed::InstanceSeed;

/// The observable record of one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Address of the deployed instance
    pub instance: Address,
    /// Factory that deployed it
    pub factory: Address,
    /// Salt the address was derived from
    pub salt: Salt,
}

/// Deterministic instance factory
///
/// One factory serves one code registry; the built-in plugin addresses are
/// part of the instance code identity, so registries with different
/// built-ins derive different instance addresses for the same salt.
pub struct InstanceFactory {
    address: Address,
    code: Arc<CodeRegistry>,
    builtins: Builtins,
    instances: DashMap<Address, Arc<Instance>>,
    records: DashMap<Address, DeploymentRecord>,
}

impl InstanceFactory {
    /// Create a factory bound to `code`, installing built-ins if needed
    #[must_use]
    pub fn new(address: Address, code: Arc<CodeRegistry>) -> Self {
        let builtins = Builtins::install(&code);
        Self {
            address,
            code,
            builtins,
            instances: DashMap::new(),
            records: DashMap::new(),
        }
    }

    /// The factory's own address
    #[inline]
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The shared code registry this factory deploys against
    #[inline]
    #[must_use]
    pub fn code(&self) -> &Arc<CodeRegistry> {
        &self.code
    }

    /// Future (or past) address of the instance deployed from `salt`
    ///
    /// Pure function of the factory address, the salt, and the instance
    /// code identity; identical before and after deployment.
    #[must_use]
    pub fn compute_instance_address(&self, salt: Salt) -> Address {
        Address::derive(&[
            b"prism.instance",
            self.address.as_bytes(),
            salt.as_bytes(),
            self.builtins.manager.as_bytes(),
            self.builtins.viewer.as_bytes(),
            self.builtins.access.as_bytes(),
        ])
    }

    /// Deploy one instance from `seed`, atomically
    ///
    /// Bootstrap order: construct with the factory holding the default and
    /// update roles, configure seeded roles, apply the initial route batch
    /// plus initializer, invoke the callback if present, renounce the
    /// factory's roles, then publish. A failure at any step drops the
    /// unpublished instance, leaving the salt deployable again.
    ///
    /// # Errors
    /// [`FactoryError::AlreadyDeployed`] if the derived address already
    /// hosts a deployment; otherwise the first failing bootstrap step's
    /// error.
    pub fn deploy(&self, seed: &InstanceSeed) -> Result<DeploymentRecord, FactoryError> {
        let address = self.compute_instance_address(seed.salt);
        if self.instances.contains_key(&address) {
            return Err(FactoryError::AlreadyDeployed(address));
        }

        let instance = self.bootstrap(address, seed).map_err(|err| {
            warn!(
                %address,
                salt = %seed.salt,
                reason = err.reason(),
                "deployment aborted"
            );
            err
        })?;

        let record = DeploymentRecord {
            instance: address,
            factory: self.address,
            salt: seed.salt,
        };
        match self.instances.entry(address) {
            dashmap::Entry::Occupied(_) => return Err(FactoryError::AlreadyDeployed(address)),
            dashmap::Entry::Vacant(slot) => {
                slot.insert(Arc::new(instance));
            }
        }
        self.records.insert(address, record);
        info!(instance = %address, factory = %self.address, salt = %seed.salt, "instance deployed");
        Ok(record)
    }

    fn bootstrap(&self, address: Address, seed: &InstanceSeed) -> Result<Instance, FactoryError> {
        let instance = Instance::new(address, Arc::clone(&self.code), &self.builtins, self.address)?;

        for grant in &seed.role_grants {
            if let Some(admin) = grant.admin {
                instance.set_role_admin(self.address, grant.role, admin)?;
            }
            for member in &grant.members {
                instance.grant_role(self.address, grant.role, *member)?;
            }
        }

        if !seed.update.is_empty() || seed.initializer.is_some() {
            instance.update(self.address, &seed.update, seed.initializer.as_ref())?;
        }

        if let Some(target) = seed.callback {
            instance
                .call_code(
                    self.address,
                    target,
                    on_deploy_selector(),
                    json!({ "instance": address, "salt": seed.salt }),
                )
                .map_err(|source| FactoryError::CallbackFailed { target, source })?;
        }

        instance.renounce_role(self.address, update_role());
        instance.renounce_role(self.address, RoleId::DEFAULT);
        Ok(instance)
    }

    /// Look up a deployed instance
    #[must_use]
    pub fn instance(&self, address: Address) -> Option<Arc<Instance>> {
        self.instances.get(&address).map(|i| Arc::clone(&i))
    }

    /// Check whether `address` hosts one of this factory's deployments
    #[inline]
    #[must_use]
    pub fn is_deployed(&self, address: Address) -> bool {
        self.instances.contains_key(&address)
    }

    /// All deployment records, in no particular order
    #[must_use]
    pub fn deployments(&self) -> Vec<DeploymentRecord> {
        self.records.iter().map(|r| *r.value()).collect()
    }
}

impl std::fmt::Debug for InstanceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceFactory")
            .field("address", &self.address)
            .field("deployed", &self.instances.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> InstanceFactory {
        InstanceFactory::new(
            Address::derive(&[b"test.factory"]),
            Arc::new(CodeRegistry::new()),
        )
    }

    #[test]
    fn address_derivation_is_pure() {
        let f = factory();
        let salt = Salt::from_label("pure");
        let before = f.compute_instance_address(salt);
        let record = f.deploy(&InstanceSeed::new(salt)).unwrap();
        assert_eq!(record.instance, before);
        assert_eq!(f.compute_instance_address(salt), before);
    }

    #[test]
    fn distinct_salts_distinct_addresses() {
        let f = factory();
        assert_ne!(
            f.compute_instance_address(Salt::from_label("a")),
            f.compute_instance_address(Salt::from_label("b"))
        );
    }

    #[test]
    fn distinct_factories_distinct_addresses() {
        let code = Arc::new(CodeRegistry::new());
        let f1 = InstanceFactory::new(Address::new([1; 20]), Arc::clone(&code));
        let f2 = InstanceFactory::new(Address::new([2; 20]), code);
        let salt = Salt::from_label("shared");
        assert_ne!(
            f1.compute_instance_address(salt),
            f2.compute_instance_address(salt)
        );
    }

    #[test]
    fn second_deploy_with_same_salt_rejected() {
        let f = factory();
        let seed = InstanceSeed::new(Salt::from_label("once"));
        f.deploy(&seed).unwrap();
        let err = f.deploy(&seed).unwrap_err();
        assert_eq!(err.reason(), "ALREADY_DEPLOYED");
    }

    #[test]
    fn factory_holds_no_roles_after_deploy() {
        let f = factory();
        let record = f.deploy(&InstanceSeed::new(Salt::from_label("clean"))).unwrap();
        let instance = f.instance(record.instance).unwrap();
        assert!(!instance.has_role(RoleId::DEFAULT, f.address()));
        assert!(!instance.has_role(update_role(), f.address()));
    }
}
