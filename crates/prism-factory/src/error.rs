//! Factory error taxonomy

use prism_runtime::RuntimeError;
use prism_types::Address;

/// Main factory error type
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// The derived address already hosts a deployment
    #[error("instance already deployed at {0}")]
    AlreadyDeployed(Address),

    /// A bootstrap step failed; the whole deployment is discarded
    #[error(transparent)]
    Bootstrap(#[from] RuntimeError),

    /// The post-deploy callback failed; the whole deployment is discarded
    #[error("deploy callback {target} failed: {source}")]
    CallbackFailed {
        /// Callback target
        target: Address,
        /// Underlying failure
        source: RuntimeError,
    },
}

impl FactoryError {
    /// Machine-checkable reason code
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::AlreadyDeployed(_) => "ALREADY_DEPLOYED",
            Self::Bootstrap(err) => err.reason(),
            Self::CallbackFailed { .. } => "CALLBACK_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_types::Selector;

    #[test]
    fn bootstrap_reason_delegates_to_source() {
        let err = FactoryError::from(RuntimeError::NoSuchOperation(Selector::new([0; 4])));
        assert_eq!(err.reason(), "NO_SUCH_OPERATION");
        assert_eq!(
            FactoryError::AlreadyDeployed(Address::ZERO).reason(),
            "ALREADY_DEPLOYED"
        );
    }
}
