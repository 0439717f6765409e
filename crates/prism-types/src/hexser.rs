//! Shared serde plumbing for fixed-width byte identifiers
//!
//! Human-readable formats get `0x`-prefixed hex strings; binary formats get
//! raw bytes. Deserialization accepts either form plus a byte sequence.

use std::fmt::{self, Formatter};
use std::marker::PhantomData;

use crate::IdError;

pub(crate) fn decode<const N: usize>(s: &str) -> Result<[u8; N], IdError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped)?;
    if bytes.len() != N {
        return Err(IdError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

pub(crate) fn serialize<S, const N: usize>(
    bytes: &[u8; N],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if serializer.is_human_readable() {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    } else {
        serializer.serialize_bytes(bytes)
    }
}

pub(crate) fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct BytesVisitor<const N: usize>(PhantomData<[u8; N]>);

    impl<'de, const N: usize> serde::de::Visitor<'de> for BytesVisitor<N> {
        type Value = [u8; N];

        fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
            write!(formatter, "a {N}-byte identifier as hex string or bytes")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            decode::<N>(value).map_err(serde::de::Error::custom)
        }

        fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if value.len() != N {
                return Err(serde::de::Error::invalid_length(value.len(), &self));
            }
            let mut arr = [0u8; N];
            arr.copy_from_slice(value);
            Ok(arr)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            let mut arr = [0u8; N];
            for (i, byte) in arr.iter_mut().enumerate() {
                *byte = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
            }
            Ok(arr)
        }
    }

    if deserializer.is_human_readable() {
        deserializer.deserialize_str(BytesVisitor::<N>(PhantomData))
    } else {
        deserializer.deserialize_bytes(BytesVisitor::<N>(PhantomData))
    }
}
