//! Well-known role identifiers

use once_cell::sync::Lazy;
use prism_types::RoleId;

static UPDATE_ROLE: Lazy<RoleId> = Lazy::new(|| RoleId::from_name("PRISM_UPDATE_ROLE"));

/// Role required to mutate an instance's route table
///
/// Gates both `update` batches and default-fallback changes. Holding the
/// default role alone does not satisfy this gate.
#[inline]
#[must_use]
pub fn update_role() -> RoleId {
    *UPDATE_ROLE
}
