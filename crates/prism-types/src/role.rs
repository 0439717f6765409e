//! Role identifiers
//!
//! Provides [`RoleId`], the 32-byte identifier for permission groups.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::IdError;
use crate::hexser;

/// A 32-byte role identifier
///
/// [`RoleId::DEFAULT`] (all zeros) is the default/admin role: its members
/// may administer any role, and it is its own admin. Named roles derive
/// from a label via [`RoleId::from_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleId([u8; 32]);

impl RoleId {
    /// The default/admin role
    pub const DEFAULT: Self = Self([0u8; 32]);

    /// Create a role id from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a role id from a role name, e.g. `"PRISM_UPDATE_ROLE"`
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(*blake3::hash(name.as_bytes()).as_bytes())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the default/admin role
    #[inline]
    #[must_use]
    pub const fn is_default(&self) -> bool {
        let mut i = 0;
        while i < 32 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl Display for RoleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for RoleId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hexser::decode::<32>(s).map(Self)
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl serde::Serialize for RoleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        hexser::serialize(&self.0, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for RoleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        hexser::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_default_is_zero() {
        assert!(RoleId::DEFAULT.is_default());
        assert!(RoleId::default().is_default());
    }

    #[test]
    fn role_from_name_deterministic_and_non_default() {
        let a = RoleId::from_name("PRISM_UPDATE_ROLE");
        let b = RoleId::from_name("PRISM_UPDATE_ROLE");
        assert_eq!(a, b);
        assert!(!a.is_default());
    }

    #[test]
    fn role_display_and_parse() {
        let role = RoleId::from_name("PRISM_METADATA_UPDATE_ROLE");
        let parsed: RoleId = role.to_string().parse().unwrap();
        assert_eq!(role, parsed);
    }

    #[test]
    fn role_serde_json_roundtrip() {
        let role = RoleId::from_name("serde");
        let json = serde_json::to_string(&role).unwrap();
        let decoded: RoleId = serde_json::from_str(&json).unwrap();
        assert_eq!(role, decoded);
    }
}
