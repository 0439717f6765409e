//! Operation selectors
//!
//! Provides [`Selector`], the 4-byte identifier naming one callable
//! operation independently of which plugin implements it.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::IdError;
use crate::hexser;

/// A 4-byte operation selector
///
/// Derived from an operation's signature string with
/// [`Selector::from_signature`]; a route table binds each selector to at
/// most one implementing target at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector([u8; 4]);

impl Selector {
    /// Create a selector from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Derive a selector from an operation signature
    ///
    /// Takes the first 4 bytes of the Blake3 hash of the signature string,
    /// e.g. `Selector::from_signature("transfer(address,uint256)")`.
    #[must_use]
    pub fn from_signature(signature: &str) -> Self {
        let hash = blake3::hash(signature.as_bytes());
        let mut arr = [0u8; 4];
        arr.copy_from_slice(&hash.as_bytes()[..4]);
        Self(arr)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Selector {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hexser::decode::<4>(s).map(Self)
    }
}

impl serde::Serialize for Selector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        hexser::serialize(&self.0, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Selector {
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
    fn selector_from_signature_deterministic() {
        let a = Selector::from_signature("update((address,uint8,bytes4[])[],address,bytes)");
        let b = Selector::from_signature("update((address,uint8,bytes4[])[],address,bytes)");
        assert_eq!(a, b);
    }

    #[test]
    fn selector_different_signatures_differ() {
        let a = Selector::from_signature("grantRole(bytes32,address)");
        let b = Selector::from_signature("revokeRole(bytes32,address)");
        assert_ne!(a, b);
    }

    #[test]
    fn selector_display_and_parse() {
        let sel = Selector::new([0xaa, 0xbb, 0xcc, 0xdd]);
        assert_eq!(sel.to_string(), "0xaabbccdd");
        let parsed: Selector = "0xaabbccdd".parse().unwrap();
        assert_eq!(sel, parsed);
    }

    #[test]
    fn selector_parse_rejects_wrong_length() {
        let result: Result<Selector, _> = "0xaabbcc".parse();
        assert!(matches!(
            result,
            Err(IdError::InvalidLength {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn selector_serde_json_roundtrip() {
        let sel = Selector::from_signature("routes()");
        let json = serde_json::to_string(&sel).unwrap();
        let decoded: Selector = serde_json::from_str(&json).unwrap();
        assert_eq!(sel, decoded);
    }
}
