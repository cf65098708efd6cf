//! Conversion between display-order hex and internal byte arrays.
//!
//! Asset ids and blinding factors travel through the wallet session as hex in *display order*,
//! the byte-reversed form used for txids. Every computation inside the signer works on the
//! natural (internal) order. Values cross between the two only through this module.
//!
//! Commitments are not affected: they are always emitted in their natural serialization order.

use thiserror::Error;

/// Errors raised while decoding display-order hex.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ByteOrderError {
    /// The input is not valid hex.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The decoded value has the wrong length.
    #[error("expected {expected} bytes, got {got}")]
    Length {
        /// Required length.
        expected: usize,
        /// Decoded length.
        got: usize,
    },
}

/// Decodes display-order hex into a 32-byte value in internal order.
pub fn from_display_hex(s: &str) -> Result<[u8; 32], ByteOrderError> {
    let mut bytes: [u8; 32] = hex::decode(s)?
        .try_into()
        .map_err(|v: Vec<u8>| ByteOrderError::Length {
            expected: 32,
            got: v.len(),
        })?;
    bytes.reverse();
    Ok(bytes)
}

/// Encodes a 32-byte internal-order value as display-order hex.
pub fn to_display_hex(bytes: &[u8; 32]) -> String {
    let mut reversed = *bytes;
    reversed.reverse();
    hex::encode(reversed)
}
