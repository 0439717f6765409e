//! Route table precondition errors

use prism_types::{Address, Selector};

/// Precondition violations raised while validating a route update batch
///
/// Any of these aborts the entire batch; no partial routing change persists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    /// `Add` targeted a selector already routed to a different target
    #[error("selector {selector} is already routed to {target}")]
    AlreadyRouted {
        /// Selector that was already bound
        selector: Selector,
        /// Target it is currently bound to
        target: Address,
    },

    /// `Replace` or `Remove` targeted a selector that is not routed
    #[error("selector {0} is not routed")]
    NotRouted(Selector),

    /// `Remove` named a target other than the selector's current one
    #[error("selector {selector} is routed to {actual}, not {expected}")]
    TargetMismatch {
        /// Selector being removed
        selector: Selector,
        /// Target named in the remove entry
        expected: Address,
        /// Target the selector is actually bound to
        actual: Address,
    },
}

impl RoutingError {
    /// Machine-checkable reason code
    #[inline]
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::AlreadyRouted { .. } => "ALREADY_ROUTED",
            Self::NotRouted(_) => "NOT_ROUTED",
            Self::TargetMismatch { .. } => "TARGET_MISMATCH",
        }
    }
}
