//! Built-in read-only route introspection plugin

use once_cell::sync::Lazy;
use prism_types::{Address, Selector};
use serde::Deserialize;
use serde_json::Value;

use crate::error::RuntimeError;
use crate::plugin::{CallContext, Plugin};

static PLUGINS: Lazy<Selector> = Lazy::new(|| Selector::from_signature("plugins()"));
static PLUGIN_SELECTORS: Lazy<Selector> =
    Lazy::new(|| Selector::from_signature("pluginFunctionSelectors(address)"));
static PLUGIN_ADDRESS: Lazy<Selector> =
    Lazy::new(|| Selector::from_signature("pluginAddress(bytes4)"));
static DEFAULT_FALLBACK: Lazy<Selector> =
    Lazy::new(|| Selector::from_signature("defaultFallback()"));

#[derive(Debug, Deserialize)]
struct TargetQuery {
    target: Address,
}

#[derive(Debug, Deserialize)]
struct SelectorQuery {
    selector: Selector,
}

/// Read-only introspection over the route table
///
/// Answers directly from the state it is handed, so results reflect the
/// table exactly at call time; there is nothing to cache and nothing to go
/// stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewerPlugin;

impl ViewerPlugin {
    /// Selector of the grouped `plugins` listing
    #[inline]
    #[must_use]
    pub fn plugins_selector() -> Selector {
        *PLUGINS
    }

    /// Selector of the per-target selector listing
    #[inline]
    #[must_use]
    pub fn plugin_selectors_selector() -> Selector {
        *PLUGIN_SELECTORS
    }

    /// Selector of the selector-to-target lookup
    #[inline]
    #[must_use]
    pub fn plugin_address_selector() -> Selector {
        *PLUGIN_ADDRESS
    }

    /// Selector of the default-fallback lookup
    #[inline]
    #[must_use]
    pub fn default_fallback_selector() -> Selector {
        *DEFAULT_FALLBACK
    }
}

impl Plugin for ViewerPlugin {
    fn name(&self) -> &str {
        "prism.builtin.viewer"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![
            Self::plugins_selector(),
            Self::plugin_selectors_selector(),
            Self::plugin_address_selector(),
            Self::default_fallback_selector(),
        ]
    }

    fn call(&self, ctx: CallContext<'_>) -> Result<Value, RuntimeError> {
        if ctx.selector == Self::plugins_selector() {
            Ok(serde_json::to_value(ctx.state.routes.routes())?)
        } else if ctx.selector == Self::plugin_selectors_selector() {
            let req: TargetQuery = serde_json::from_value(ctx.payload)?;
            Ok(serde_json::to_value(ctx.state.routes.selectors_of(req.target))?)
        } else if ctx.selector == Self::plugin_address_selector() {
            let req: SelectorQuery = serde_json::from_value(ctx.payload)?;
            Ok(serde_json::to_value(ctx.state.routes.target_of(req.selector))?)
        } else if ctx.selector == Self::default_fallback_selector() {
            Ok(serde_json::to_value(ctx.state.fallback())?)
        } else {
            Err(RuntimeError::NoSuchOperation(ctx.selector))
        }
    }
}
