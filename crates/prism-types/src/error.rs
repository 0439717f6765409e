//! Parse errors for fixed-width identifiers

/// Errors that can occur when parsing an identifier from bytes or hex
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Input had the wrong number of bytes
    #[error("invalid identifier length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required byte length
        expected: usize,
        /// Byte length actually supplied
        actual: usize,
    },

    /// Hex decoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
