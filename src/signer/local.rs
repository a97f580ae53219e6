//! In-memory secp256k1 key.

use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;

use crate::crypto::{to_wire_signature, SIGNATURE_LENGTH};
use crate::error::{ThorError, ThorResult};
use crate::signer::TxSigner;

/// Environment variable holding the origin's private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "THOR_PRIVATE_KEY";

/// Environment variable holding a local gas payer's private key.
pub const DELEGATOR_KEY_ENV_VAR: &str = "THOR_DELEGATOR_PRIVATE_KEY";

/// Signer backed by a private key held in memory.
#[derive(Clone)]
pub struct LocalSigner {
    signer: PrivateKeySigner,
}

impl LocalSigner {
    /// Create a signer from a hex-encoded private key (with or without 0x).
    ///
    /// The key is never logged.
    pub fn from_private_key(private_key_hex: &str) -> ThorResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ThorError::Signing(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Local signer initialized");

        Ok(Self { signer })
    }

    /// Load a signer from the named environment variable.
    pub fn from_env(var_name: &str) -> ThorResult<Self> {
        let private_key = std::env::var(var_name).map_err(|_| {
            ThorError::Signing(format!("Environment variable {} not set", var_name))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Generate a fresh random key.
    pub fn random() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }
}

#[async_trait]
impl TxSigner for LocalSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign(&self, hash: &B256) -> ThorResult<[u8; SIGNATURE_LENGTH]> {
        let signature = self
            .signer
            .sign_hash(hash)
            .await
            .map_err(|e| ThorError::Signing(format!("Signing failed: {}", e)))?;
        Ok(to_wire_signature(&signature))
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.signer.address())
            .finish()
    }
}
