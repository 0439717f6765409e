//! Core privileged operations
//!
//! Shared by the typed [`Instance`](crate::Instance) API and the built-in
//! manager plugin, so the dispatched self-modification path and the direct
//! path enforce identical semantics.

use prism_access::{update_role, AccessError};
use prism_routing::RouteUpdate;
use prism_types::Address;

use crate::error::RuntimeError;
use crate::instance::Initializer;
use crate::plugin::{init_selector, CallContext, CodeRegistry};
use crate::state::InstanceState;

/// Gate for route-table mutation: membership in the update role, nothing
/// less. Holding the default role alone does not pass.
pub(crate) fn ensure_update_role(
    state: &InstanceState,
    caller: Address,
) -> Result<(), RuntimeError> {
    let role = update_role();
    if state.roles.has_role(role, caller) {
        Ok(())
    } else {
        Err(AccessError::Unauthorized {
            role,
            account: caller,
        }
        .into())
    }
}

/// Apply a route update batch plus optional one-time initializer
///
/// Runs against whatever state it is handed; the caller owns the
/// scratch/commit discipline. Batch and initializer are one atomic unit from
/// the caller's point of view because any error here propagates before the
/// scratch state is committed.
pub(crate) fn apply_update(
    state: &mut InstanceState,
    code: &CodeRegistry,
    instance: Address,
    caller: Address,
    update: &RouteUpdate,
    initializer: Option<&Initializer>,
) -> Result<(), RuntimeError> {
    ensure_update_role(state, caller)?;
    state.routes.apply(update)?;
    if let Some(init) = initializer {
        run_initializer(state, code, instance, caller, init)?;
    }
    Ok(())
}

fn run_initializer(
    state: &mut InstanceState,
    code: &CodeRegistry,
    instance: Address,
    caller: Address,
    init: &Initializer,
) -> Result<(), RuntimeError> {
    let plugin = code
        .get(init.target)
        .ok_or(RuntimeError::MissingCode(init.target))?;
    let ctx = CallContext {
        instance,
        caller,
        selector: init_selector(),
        payload: init.payload.clone(),
        state,
        code,
    };
    plugin
        .call(ctx)
        .map_err(|source| RuntimeError::InitializerFailed {
            target: init.target,
            source: Box::new(source),
        })?;
    Ok(())
}

/// Set or clear the dispatcher's default fallback target
pub(crate) fn set_fallback(
    state: &mut InstanceState,
    caller: Address,
    target: Option<Address>,
) -> Result<(), RuntimeError> {
    ensure_update_role(state, caller)?;
    state.set_fallback(target);
    Ok(())
}
