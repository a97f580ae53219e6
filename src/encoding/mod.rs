//! Canonical binary encoding.
//!
//! # Data Flow
//! ```text
//! Clause / Transaction
//!     → rlp.rs (recursive length prefix, via alloy-rlp)
//!     → bytes (hashing, wire submission)
//!     → 0x-prefixed hex (JSON transport boundary)
//! ```
//!
//! # Design Decisions
//! - Decoding is exact: trailing bytes are an error
//! - Absent optional fields encode as the empty string, distinct from any
//!   present fixed-width value
//! - Every decode failure surfaces as `ThorError::MalformedEncoding`

pub mod rlp;

pub use rlp::{decode_exact, RlpItem};

use crate::error::{ThorError, ThorResult};

/// Decode a hex string, with or without the `0x` prefix.
pub fn decode_hex(input: &str) -> ThorResult<Vec<u8>> {
    alloy::hex::decode(input.trim())
        .map_err(|e| ThorError::MalformedEncoding(format!("Invalid hex '{}': {}", input, e)))
}

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    alloy::hex::encode_prefixed(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_prefix_optional() {
        assert_eq!(decode_hex("0xdead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(decode_hex("dead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(encode_hex([0xbe, 0xef]), "0xbeef");
        assert_eq!(encode_hex([0u8; 0]), "0x");
    }

    #[test]
    fn test_invalid_hex() {
        let err = decode_hex("0xzz").unwrap_err();
        assert!(matches!(err, ThorError::MalformedEncoding(_)));
    }
}
