//! Account and code addresses
//!
//! Provides [`Address`], the 20-byte identifier for accounts, instances, and
//! installed plugin code.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::IdError;
use crate::hexser;

/// A 20-byte account/code address
///
/// Identifies external accounts, deployed instances, and installed plugin
/// code within a code registry. Derived addresses are a pure function of
/// their inputs via [`Address::derive`]. Immutable and cheap to clone (Copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address, used as an explicit "no target" sentinel at
    /// wire boundaries
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Create an address from a byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 20 bytes
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
        if bytes.len() != 20 {
            return Err(IdError::InvalidLength {
                expected: 20,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Derive an address deterministically from an ordered list of inputs
    ///
    /// The derivation is a pure function of `parts`: the same inputs always
    /// produce the same address, independent of any runtime state. Callers
    /// are expected to lead with a domain-separation label.
    #[must_use]
    pub fn derive(parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            // Length-prefix each part so ["ab","c"] and ["a","bc"] differ
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        let hash = hasher.finalize();
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&hash.as_bytes()[..20]);
        Self(arr)
    }

    /// Check if this is the zero address
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < 20 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Short string representation (first 8 hex chars, no prefix)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hexser::decode::<20>(s).map(Self)
    }
}

impl AsRef<[u8; 20]> for Address {
    fn as_ref(&self) -> &[u8; 20] {
        &self.0
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::ZERO
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        hexser::serialize(&self.0, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Address {
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
    fn address_new_and_access() {
        let bytes = [7u8; 20];
        let addr = Address::new(bytes);
        assert_eq!(addr.as_bytes(), &bytes);
    }

    #[test]
    fn address_from_slice_invalid_length() {
        let result = Address::from_slice(&[1u8; 19]);
        assert!(matches!(
            result,
            Err(IdError::InvalidLength {
                expected: 20,
                actual: 19
            })
        ));
    }

    #[test]
    fn address_derive_deterministic() {
        let a = Address::derive(&[b"prism.code", b"metadata"]);
        let b = Address::derive(&[b"prism.code", b"metadata"]);
        assert_eq!(a, b);
    }

    #[test]
    fn address_derive_part_boundaries_matter() {
        let a = Address::derive(&[b"ab", b"c"]);
        let b = Address::derive(&[b"a", b"bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn address_display_and_parse() {
        let addr = Address::derive(&[b"roundtrip"]);
        let s = addr.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 42);
        let parsed: Address = s.parse().unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn address_parse_without_prefix() {
        let addr = Address::new([0xab; 20]);
        let parsed: Address = hex::encode([0xab; 20]).parse().unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn address_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!Address::derive(&[b"x"]).is_zero());
    }

    #[test]
    fn address_serde_json_roundtrip() {
        let addr = Address::derive(&[b"serde"]);
        let json = serde_json::to_string(&addr).unwrap();
        assert!(json.contains("0x"));
        let decoded: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, decoded);
    }
}
