//! Built-in plugins
//!
//! Every instance self-hosts its management surface: the route-table
//! manager, the read-only viewer, and the role store are themselves plugins,
//! installed in the shared code registry and routed by
//! [`Instance::new`](crate::Instance::new). A dispatched call can therefore
//! route to the manager and upgrade the very instance it runs in, under the
//! same role gate and scratch-commit discipline as the typed API.

mod access;
mod manager;
mod viewer;

pub use access::AccessPlugin;
pub use manager::ManagerPlugin;
pub use viewer::ViewerPlugin;

use std::sync::Arc;

use prism_routing::RouteUpdate;
use prism_types::Address;

use crate::plugin::{CodeRegistry, Plugin};

/// Addresses of the built-in plugins within one code registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtins {
    /// Route-table manager (update, default fallback)
    pub manager: Address,
    /// Read-only route introspection
    pub viewer: Address,
    /// Role store operations
    pub access: Address,
}

impl Builtins {
    /// Install the built-in plugins into `code`, reusing existing
    /// installations
    ///
    /// Built-ins are shared singletons: the same addresses serve every
    /// instance created against this registry.
    #[must_use]
    pub fn install(code: &CodeRegistry) -> Self {
        Self {
            manager: code.ensure_installed(Arc::new(ManagerPlugin)),
            viewer: code.ensure_installed(Arc::new(ViewerPlugin)),
            access: code.ensure_installed(Arc::new(AccessPlugin)),
        }
    }

    /// The route batch installing all built-in selectors
    #[must_use]
    pub fn route_update(&self) -> RouteUpdate {
        RouteUpdate::new()
            .add(self.manager, ManagerPlugin.selectors())
            .add(self.viewer, ViewerPlugin.selectors())
            .add(self.access, AccessPlugin.selectors())
    }
}
