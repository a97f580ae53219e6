//! Signing capability.
//!
//! # Responsibilities
//! - Abstract over where a key lives (memory, remote service, hardware)
//! - Pick the right hash for each role: origin signs the signing hash,
//!   a delegator signs the delegator signing hash bound to the origin
//! - Compose one or two signers into the final 65 or 130 byte signature
//!
//! # Security
//! - Private keys are loaded only from environment variables or passed in
//! - Keys are never logged or serialized

pub mod local;
pub mod remote;

use alloy::primitives::{Address, B256};
use async_trait::async_trait;

use crate::crypto::SIGNATURE_LENGTH;
use crate::error::{ThorError, ThorResult};
use crate::transaction::Transaction;

pub use local::LocalSigner;
pub use remote::RemoteDelegator;

/// Anything able to produce recoverable signatures for one address.
#[async_trait]
pub trait TxSigner: Send + Sync {
    /// Address the produced signatures recover to.
    fn address(&self) -> Address;

    /// Sign a 32-byte digest, returning `r || s || v` with `v` in {0, 1}.
    async fn sign(&self, hash: &B256) -> ThorResult<[u8; SIGNATURE_LENGTH]>;

    /// Sign `tx` as its origin.
    async fn sign_as_origin(&self, tx: &Transaction) -> ThorResult<[u8; SIGNATURE_LENGTH]> {
        self.sign(&tx.signing_hash()).await
    }

    /// Sign `tx` as the gas payer for `origin`.
    async fn sign_as_delegator(
        &self,
        tx: &Transaction,
        origin: &Address,
    ) -> ThorResult<[u8; SIGNATURE_LENGTH]> {
        self.sign(&tx.delegator_signing_hash(origin)).await
    }
}

/// Sign `tx` with its origin and, for delegated transactions, its gas payer.
///
/// The delegation flag of `tx` must agree with whether a delegator is given.
/// The returned transaction is checked to recover to the signers' addresses.
pub async fn sign_transaction(
    tx: &Transaction,
    origin: &dyn TxSigner,
    delegator: Option<&dyn TxSigner>,
) -> ThorResult<Transaction> {
    let origin_address = origin.address();
    let mut signature = origin.sign_as_origin(tx).await?.to_vec();

    match (tx.is_delegated(), delegator) {
        (true, Some(delegator)) => {
            let delegator_sig = delegator.sign_as_delegator(tx, &origin_address).await?;
            signature.extend_from_slice(&delegator_sig);
        }
        (true, None) => {
            return Err(ThorError::Signing(
                "Delegated transaction requires a delegator".to_string(),
            ))
        }
        (false, Some(_)) => {
            return Err(ThorError::Signing(
                "Delegator given for a transaction without the delegation feature".to_string(),
            ))
        }
        (false, None) => {}
    }

    let signed = tx.with_signature(signature);
    if signed.origin()? != origin_address {
        return Err(ThorError::Signing(
            "Origin signature does not recover to the signer".to_string(),
        ));
    }

    tracing::debug!(
        origin = %origin_address,
        delegated = signed.is_delegated(),
        "Transaction signed"
    );

    Ok(signed)
}
