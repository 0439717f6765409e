//! PRISM instance factory
//!
//! Deploys [`Instance`](prism_runtime::Instance)s from self-contained
//! [`InstanceSeed`]s: the instance's address is a pure function of the
//! factory address, the salt, and the instance code identity, so integration
//! partners can compute it before the deployment exists. Bootstrap (role
//! grants, initial routes, initializer, callback) is one atomic unit:
//! either the fully-configured instance is published with the factory
//! holding no roles on it, or nothing is reachable at all.
//!
//! # Example
//!
//! ```rust,ignore
//! let factory = InstanceFactory::new(factory_address, code);
//! let expected = factory.compute_instance_address(seed.salt);
//! let record = factory.deploy(&seed)?;
//! assert_eq!(record.instance, expected);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod factory;
mod seed;

pub use error::FactoryError;
pub use factory::{DeploymentRecord, InstanceFactory};
pub use seed::{InstanceSeed, RoleGrant};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
