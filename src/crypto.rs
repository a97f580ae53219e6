//! Hashing and signature primitives of the Thor protocol.
//!
//! Thor hashes with blake2b-256 and signs with secp256k1. Signatures are
//! 65 bytes laid out as `r ‖ s ‖ v` where `v` is the raw recovery id (0 or 1).

use alloy::primitives::{Address, Signature, B256, U256};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use crate::error::{ThorError, ThorResult};

type Blake2b256 = Blake2b<U32>;

/// Length of a single recoverable signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Hash the concatenation of `parts` with blake2b-256.
pub fn blake2b256(parts: &[&[u8]]) -> B256 {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    B256::from_slice(&hasher.finalize())
}

/// Recover the signer address of a 65-byte signature over `hash`.
pub fn recover_address(hash: &B256, signature: &[u8]) -> ThorResult<Address> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(ThorError::InvalidSignature(format!(
            "expected {} bytes, got {}",
            SIGNATURE_LENGTH,
            signature.len()
        )));
    }

    let y_parity = match signature[64] {
        0 => false,
        1 => true,
        v => {
            return Err(ThorError::InvalidSignature(format!(
                "invalid recovery id {}",
                v
            )))
        }
    };

    let signature = Signature::new(
        U256::from_be_slice(&signature[..32]),
        U256::from_be_slice(&signature[32..64]),
        y_parity,
    );

    signature
        .recover_address_from_prehash(hash)
        .map_err(|e| ThorError::InvalidSignature(e.to_string()))
}

/// Lay out an ECDSA signature in the Thor wire format.
pub fn to_wire_signature(signature: &Signature) -> [u8; SIGNATURE_LENGTH] {
    let mut out = [0u8; SIGNATURE_LENGTH];
    out[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
    out[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
    out[64] = signature.v() as u8;
    out
}
