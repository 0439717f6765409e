//! PRISM instance runtime
//!
//! A PRISM [`Instance`] is a long-lived object whose callable surface is a
//! mutable route table: 4-byte selectors resolve to plugin code installed in
//! a shared [`CodeRegistry`], and the resolved plugin executes against the
//! *instance's own* persistent state. Plugins supply code, instances supply
//! storage, so modules install and upgrade without data migration.
//!
//! # Core Concepts
//!
//! - [`Plugin`]: trait every installable module implements
//! - [`CodeRegistry`]: shared `Address -> code` space standing in for the
//!   substrate's global contract space
//! - [`Instance`]: owns one route table, one role store, and one storage
//!   map; every mutating call runs against a scratch copy committed only on
//!   success
//! - [`Builtins`]: the self-hosted manager/viewer/access plugins every
//!   instance routes at construction, so an instance can upgrade itself
//!   through its own dispatcher
//!
//! # Example
//!
//! ```rust,ignore
//! let code = Arc::new(CodeRegistry::new());
//! let builtins = Builtins::install(&code);
//! let instance = Instance::new(address, Arc::clone(&code), &builtins, admin)?;
//!
//! instance.update(admin, &RouteUpdate::new().add(target, selectors), None)?;
//! let out = instance.dispatch(caller, selector, payload)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builtin;
mod error;
mod instance;
mod ops;
mod plugin;
mod state;

pub use builtin::{AccessPlugin, Builtins, ManagerPlugin, ViewerPlugin};
pub use error::RuntimeError;
pub use instance::{Initializer, Instance};
pub use plugin::{init_selector, on_deploy_selector, CallContext, CodeRegistry, Plugin};
pub use state::InstanceState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
