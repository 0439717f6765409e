//! Built-in route-table manager plugin

use once_cell::sync::Lazy;
use prism_routing::RouteUpdate;
use prism_types::{Address, Selector};
use serde::Deserialize;
use serde_json::Value;

use crate::error::RuntimeError;
use crate::instance::Initializer;
use crate::ops;
use crate::plugin::{CallContext, Plugin};

static UPDATE: Lazy<Selector> =
    Lazy::new(|| Selector::from_signature("update((address,uint8,bytes4[])[],address,bytes)"));
static FALLBACK: Lazy<Selector> =
    Lazy::new(|| Selector::from_signature("updateDefaultFallback(address)"));

/// Dispatched request payload for `update`
#[derive(Debug, Deserialize)]
struct UpdateRequest {
    #[serde(default)]
    update: RouteUpdate,
    #[serde(default)]
    initializer: Option<Initializer>,
}

/// Dispatched request payload for `updateDefaultFallback`
#[derive(Debug, Deserialize)]
struct FallbackRequest {
    target: Option<Address>,
}

/// The self-hosted upgrade surface
///
/// Routes `update` and `updateDefaultFallback` through the dispatcher to the
/// same core operations the typed API uses. The dispatcher's scratch-commit
/// handling makes batch + initializer atomic for free: the plugin mutates a
/// scratch state that is discarded wholesale on error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagerPlugin;

impl ManagerPlugin {
    /// Selector of the `update` operation
    #[inline]
    #[must_use]
    pub fn update_selector() -> Selector {
        *UPDATE
    }

    /// Selector of the `updateDefaultFallback` operation
    #[inline]
    #[must_use]
    pub fn fallback_selector() -> Selector {
        *FALLBACK
    }
}

impl Plugin for ManagerPlugin {
    fn name(&self) -> &str {
        "prism.builtin.manager"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![Self::update_selector(), Self::fallback_selector()]
    }

    fn call(&self, ctx: CallContext<'_>) -> Result<Value, RuntimeError> {
        if ctx.selector == Self::update_selector() {
            let req: UpdateRequest = serde_json::from_value(ctx.payload)?;
            ops::apply_update(
                ctx.state,
                ctx.code,
                ctx.instance,
                ctx.caller,
                &req.update,
                req.initializer.as_ref(),
            )?;
            Ok(Value::Null)
        } else if ctx.selector == Self::fallback_selector() {
            let req: FallbackRequest = serde_json::from_value(ctx.payload)?;
            ops::set_fallback(ctx.state, ctx.caller, req.target)?;
            Ok(Value::Null)
        } else {
            Err(RuntimeError::NoSuchOperation(ctx.selector))
        }
    }
}
