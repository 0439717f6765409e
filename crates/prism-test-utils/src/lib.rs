//! Shared test plugins and fixtures for the PRISM workspace
//!
//! Everything here is ordinary library code so downstream crates can pull it
//! in as a dev-dependency: a handful of small plugins exercising storage
//! writes, role gates, initializers, failure paths, and deploy callbacks,
//! plus the boilerplate for standing up a registry with built-ins installed.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use prism_runtime::{
    init_selector, on_deploy_selector, Builtins, CallContext, CodeRegistry, Plugin, RuntimeError,
};
use prism_types::{Address, RoleId, Selector};
use serde::Deserialize;
use serde_json::{json, Value};

/// A fresh code registry with the built-in plugins installed
#[must_use]
pub fn registry_with_builtins() -> (Arc<CodeRegistry>, Builtins) {
    let code = Arc::new(CodeRegistry::new());
    let builtins = Builtins::install(&code);
    (code, builtins)
}

/// Deterministic throwaway account address
#[must_use]
pub fn test_address(n: u8) -> Address {
    Address::new([n; 20])
}

// ---- counter ----

static INCREMENT: Lazy<Selector> = Lazy::new(|| Selector::from_signature("increment()"));
static COUNT: Lazy<Selector> = Lazy::new(|| Selector::from_signature("count()"));

/// Monotonic counter kept in instance storage under `"counter"`
#[derive(Debug, Clone, Copy, Default)]
pub struct Counter;

impl Counter {
    /// Selector incrementing the counter
    #[inline]
    #[must_use]
    pub fn increment_selector() -> Selector {
        *INCREMENT
    }

    /// Selector reading the counter
    #[inline]
    #[must_use]
    pub fn count_selector() -> Selector {
        *COUNT
    }
}

impl Plugin for Counter {
    fn name(&self) -> &str {
        "prism.test.counter"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![Self::increment_selector(), Self::count_selector()]
    }

    fn call(&self, ctx: CallContext<'_>) -> Result<Value, RuntimeError> {
        let current = ctx
            .state
            .get("counter")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        if ctx.selector == Self::increment_selector() {
            ctx.state.set("counter", json!(current + 1));
            Ok(json!(current + 1))
        } else if ctx.selector == Self::count_selector() {
            Ok(json!(current))
        } else {
            Err(RuntimeError::NoSuchOperation(ctx.selector))
        }
    }
}

// ---- metadata ----

static METADATA_URI: Lazy<Selector> = Lazy::new(|| Selector::from_signature("metadataUri()"));
static SET_METADATA_URI: Lazy<Selector> =
    Lazy::new(|| Selector::from_signature("setMetadataUri(string)"));
static METADATA_ROLE: Lazy<RoleId> = Lazy::new(|| RoleId::from_name("PRISM_METADATA_UPDATE_ROLE"));

/// Role allowed to change the metadata URI after initialization
#[inline]
#[must_use]
pub fn metadata_update_role() -> RoleId {
    *METADATA_ROLE
}

#[derive(Debug, Deserialize)]
struct MetadataPayload {
    uri: String,
}

/// Instance metadata plugin: one URI, settable only by
/// [`metadata_update_role`] holders
///
/// Its `init(bytes)` handler seeds the URI from the one-time initializer
/// payload, so a deploy can route and configure it in a single atomic batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metadata;

impl Metadata {
    /// Selector reading the URI
    #[inline]
    #[must_use]
    pub fn uri_selector() -> Selector {
        *METADATA_URI
    }

    /// Selector changing the URI (role-gated)
    #[inline]
    #[must_use]
    pub fn set_uri_selector() -> Selector {
        *SET_METADATA_URI
    }
}

impl Plugin for Metadata {
    fn name(&self) -> &str {
        "prism.test.metadata"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![Self::uri_selector(), Self::set_uri_selector()]
    }

    fn call(&self, ctx: CallContext<'_>) -> Result<Value, RuntimeError> {
        if ctx.selector == Self::uri_selector() {
            Ok(ctx.state.get("metadata.uri").cloned().unwrap_or(Value::Null))
        } else if ctx.selector == Self::set_uri_selector() {
            if !ctx.state.roles.has_role(metadata_update_role(), ctx.caller) {
                return Err(prism_access::AccessError::Unauthorized {
                    role: metadata_update_role(),
                    account: ctx.caller,
                }
                .into());
            }
            let req: MetadataPayload = serde_json::from_value(ctx.payload)?;
            ctx.state.set("metadata.uri", json!(req.uri));
            Ok(Value::Null)
        } else if ctx.selector == init_selector() {
            let req: MetadataPayload = serde_json::from_value(ctx.payload)?;
            ctx.state.set("metadata.uri", json!(req.uri));
            Ok(Value::Null)
        } else {
            Err(RuntimeError::NoSuchOperation(ctx.selector))
        }
    }
}

// ---- failure injection ----

static WRITE_THEN_FAIL: Lazy<Selector> = Lazy::new(|| Selector::from_signature("writeThenFail()"));

/// Writes a storage key, then fails; nothing it writes may ever persist
#[derive(Debug, Clone, Copy, Default)]
pub struct Reverter;

impl Reverter {
    /// The single selector this plugin answers
    #[inline]
    #[must_use]
    pub fn selector() -> Selector {
        *WRITE_THEN_FAIL
    }
}

impl Plugin for Reverter {
    fn name(&self) -> &str {
        "prism.test.reverter"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![Self::selector()]
    }

    fn call(&self, ctx: CallContext<'_>) -> Result<Value, RuntimeError> {
        ctx.state.set("reverter.marker", json!("must not persist"));
        Err(RuntimeError::Plugin(anyhow::anyhow!(
            "reverter plugin always fails"
        )))
    }
}

// ---- deploy callback ----

/// Records every `onDeploy` payload it receives
///
/// Hold on to the [`Arc`] used to build it and inspect
/// [`RecordingCallback::calls`] after the deploy completes.
#[derive(Debug, Default)]
pub struct RecordingCallback {
    calls: Mutex<Vec<Value>>,
}

impl RecordingCallback {
    /// Create a fresh recorder
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Payloads received so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().clone()
    }
}

impl Plugin for RecordingCallback {
    fn name(&self) -> &str {
        "prism.test.recording-callback"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![on_deploy_selector()]
    }

    fn call(&self, ctx: CallContext<'_>) -> Result<Value, RuntimeError> {
        if ctx.selector != on_deploy_selector() {
            return Err(RuntimeError::NoSuchOperation(ctx.selector));
        }
        self.calls.lock().push(ctx.payload);
        Ok(Value::Null)
    }
}

/// Fails every `onDeploy`, for aborted-bootstrap tests
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCallback;

impl Plugin for FailingCallback {
    fn name(&self) -> &str {
        "prism.test.failing-callback"
    }

    fn selectors(&self) -> Vec<Selector> {
        vec![on_deploy_selector()]
    }

    fn call(&self, _ctx: CallContext<'_>) -> Result<Value, RuntimeError> {
        Err(RuntimeError::Plugin(anyhow::anyhow!(
            "callback rejects this deployment"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_runtime::Instance;

    #[test]
    fn counter_round_trip() {
        let (code, builtins) = registry_with_builtins();
        let admin = test_address(1);
        let counter = code.install(Arc::new(Counter)).unwrap();
        let instance = Instance::new(test_address(10), Arc::clone(&code), &builtins, admin).unwrap();
        instance
            .update(
                admin,
                &prism_routing::RouteUpdate::new().add(counter, Counter.selectors()),
                None,
            )
            .unwrap();

        assert_eq!(
            instance
                .dispatch(admin, Counter::count_selector(), Value::Null)
                .unwrap(),
            json!(0)
        );
        instance
            .dispatch(admin, Counter::increment_selector(), Value::Null)
            .unwrap();
        assert_eq!(
            instance
                .dispatch(admin, Counter::count_selector(), Value::Null)
                .unwrap(),
            json!(1)
        );
    }

    #[test]
    fn metadata_setter_is_role_gated() {
        let (code, builtins) = registry_with_builtins();
        let admin = test_address(1);
        let editor = test_address(2);
        let metadata = code.install(Arc::new(Metadata)).unwrap();
        let instance = Instance::new(test_address(11), Arc::clone(&code), &builtins, admin).unwrap();
        instance
            .update(
                admin,
                &prism_routing::RouteUpdate::new().add(metadata, Metadata.selectors()),
                None,
            )
            .unwrap();

        let err = instance
            .dispatch(
                editor,
                Metadata::set_uri_selector(),
                json!({ "uri": "ipfs://nope" }),
            )
            .unwrap_err();
        assert_eq!(err.reason(), "UNAUTHORIZED");

        instance
            .grant_role(admin, metadata_update_role(), editor)
            .unwrap();
        instance
            .dispatch(
                editor,
                Metadata::set_uri_selector(),
                json!({ "uri": "ipfs://updated" }),
            )
            .unwrap();
        assert_eq!(
            instance
                .dispatch(admin, Metadata::uri_selector(), Value::Null)
                .unwrap(),
            json!("ipfs://updated")
        );
    }
}
