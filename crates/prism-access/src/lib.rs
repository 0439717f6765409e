//! PRISM access control
//!
//! Role membership and admin-of relationships for one instance.
//!
//! # Core Concepts
//!
//! - [`RoleStore`]: per-instance membership map, mutated only through
//!   explicit grant/revoke/renounce calls
//! - [`RoleId::DEFAULT`](prism_types::RoleId::DEFAULT): members may
//!   administer any role, including the default role itself
//! - every other role is administered by its configured admin role
//!   (defaulting to the default role)
//!
//! Authorization fails closed: [`RoleStore::ensure_can_administer`] returns
//! [`AccessError::Unauthorized`] unless an explicit membership check passes.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod roles;
mod store;

pub use error::AccessError;
pub use roles::update_role;
pub use store::{RoleStore, RoleMembers};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
