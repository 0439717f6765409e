//! Runtime error taxonomy
//!
//! Every failure aborts the entire enclosing call (dispatched operation,
//! update batch, or bootstrap) and surfaces to the caller with a
//! machine-checkable reason code. Nothing is recovered locally.

use prism_access::AccessError;
use prism_routing::RoutingError;
use prism_types::{Address, Selector};

/// Main runtime error type
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Route table precondition violation
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Role check failed
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Dispatcher miss with no default fallback configured
    #[error("no route for selector {0} and no default fallback set")]
    NoSuchOperation(Selector),

    /// A routed target has no code installed in the registry
    #[error("no code installed at {0}")]
    MissingCode(Address),

    /// Attempted to install code over an occupied address
    #[error("code already installed at {0}")]
    AlreadyInstalled(Address),

    /// The one-time initializer accompanying an update batch failed;
    /// batch and initializer are discarded together
    #[error("initializer {target} failed: {source}")]
    InitializerFailed {
        /// Initializer target
        target: Address,
        /// Underlying failure
        source: Box<RuntimeError>,
    },

    /// A call payload could not be decoded into the operation's request type
    #[error("malformed call payload: {0}")]
    BadPayload(String),

    /// Opaque plugin-internal failure
    #[error("plugin failure: {0}")]
    Plugin(#[from] anyhow::Error),
}

impl From<serde_json::Error> for RuntimeError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadPayload(err.to_string())
    }
}

impl RuntimeError {
    /// Machine-checkable reason code
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Routing(err) => err.reason(),
            Self::Access(err) => err.reason(),
            Self::NoSuchOperation(_) => "NO_SUCH_OPERATION",
            Self::MissingCode(_) => "MISSING_CODE",
            Self::AlreadyInstalled(_) => "ALREADY_INSTALLED",
            Self::InitializerFailed { .. } => "INITIALIZER_FAILED",
            Self::BadPayload(_) => "BAD_PAYLOAD",
            Self::Plugin(_) => "PLUGIN_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_delegate_to_sources() {
        let err = RuntimeError::from(RoutingError::NotRouted(Selector::new([1, 2, 3, 4])));
        assert_eq!(err.reason(), "NOT_ROUTED");

        let err = RuntimeError::from(AccessError::Unauthorized {
            role: prism_types::RoleId::DEFAULT,
            account: Address::ZERO,
        });
        assert_eq!(err.reason(), "UNAUTHORIZED");
    }

    #[test]
    fn initializer_failure_wraps_source() {
        let inner = RuntimeError::NoSuchOperation(Selector::new([0; 4]));
        let err = RuntimeError::InitializerFailed {
            target: Address::ZERO,
            source: Box::new(inner),
        };
        assert_eq!(err.reason(), "INITIALIZER_FAILED");
        assert!(err.to_string().contains("initializer"));
    }
}
