//! Deployment salts
//!
//! Provides [`Salt`], the 32-byte deterministic input from which a
//! not-yet-created instance's future address is derived.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::IdError;
use crate::hexser;

/// A 32-byte deployment salt
///
/// Typically derived from a human-readable label, e.g.
/// `Salt::from_label("prism.salt.443e20e5")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Salt([u8; 32]);

impl Salt {
    /// Create a salt from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a salt from a label string
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self(*blake3::hash(label.as_bytes()).as_bytes())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Display for Salt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Salt {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hexser::decode::<32>(s).map(Self)
    }
}

impl serde::Serialize for Salt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        hexser::serialize(&self.0, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Salt {
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
    fn salt_from_label_deterministic() {
        assert_eq!(Salt::from_label("prism.salt.a"), Salt::from_label("prism.salt.a"));
        assert_ne!(Salt::from_label("prism.salt.a"), Salt::from_label("prism.salt.b"));
    }

    #[test]
    fn salt_display_and_parse() {
        let salt = Salt::from_label("roundtrip");
        let parsed: Salt = salt.to_string().parse().unwrap();
        assert_eq!(salt, parsed);
    }
}
