//! Access control errors

use prism_types::{Address, RoleId};

/// Errors raised by role membership checks and mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Caller is not a member of the role's admin role or the default role
    #[error("account {account} is not authorized to administer role {role}")]
    Unauthorized {
        /// Role the caller attempted to administer
        role: RoleId,
        /// The unauthorized caller
        account: Address,
    },
}

impl AccessError {
    /// Machine-checkable reason code
    #[inline]
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
        }
    }
}
