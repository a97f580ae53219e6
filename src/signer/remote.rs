//! Fee-delegation service client.
//!
//! The service receives the origin and the unsigned transaction, decides
//! whether to sponsor it, and answers with the gas payer's signature over the
//! delegator signing hash.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use crate::crypto::{recover_address, SIGNATURE_LENGTH};
use crate::encoding::decode_hex;
use crate::error::{ThorError, ThorResult};
use crate::signer::TxSigner;
use crate::transaction::Transaction;

#[derive(Debug, Serialize)]
struct DelegationRequest {
    origin: Address,
    raw: String,
}

#[derive(Debug, Deserialize)]
struct DelegationResponse {
    signature: String,
}

/// Gas payer reachable over HTTP.
#[derive(Clone)]
pub struct RemoteDelegator {
    http: reqwest::Client,
    url: String,
    gas_payer: Address,
    timeout_duration: Duration,
}

impl RemoteDelegator {
    /// Create a client for the service at `url` sponsoring as `gas_payer`.
    pub fn new(url: &str, gas_payer: Address, timeout_duration: Duration) -> ThorResult<Self> {
        let parsed: url::Url = url.parse().map_err(|e| {
            ThorError::Signing(format!("Invalid delegation URL '{}': {}", url, e))
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            url: parsed.to_string(),
            gas_payer,
            timeout_duration,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request_signature(&self, tx: &Transaction, origin: &Address) -> ThorResult<Vec<u8>> {
        let body = DelegationRequest {
            origin: *origin,
            raw: tx.encoded_hex(),
        };

        let send = async {
            let response = self
                .http
                .post(&self.url)
                .json(&body)
                .send()
                .await
                .map_err(|e| ThorError::Signing(format!("Delegation request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ThorError::Signing(format!(
                    "Delegation refused with status {}: {}",
                    status.as_u16(),
                    message.trim()
                )));
            }

            response
                .json::<DelegationResponse>()
                .await
                .map_err(|e| ThorError::Signing(format!("Invalid delegation response: {}", e)))
        };

        let response = timeout(self.timeout_duration, send)
            .await
            .map_err(|_| ThorError::Timeout(self.timeout_duration.as_secs()))??;

        decode_hex(&response.signature)
    }
}

#[async_trait]
impl TxSigner for RemoteDelegator {
    fn address(&self) -> Address {
        self.gas_payer
    }

    /// The service only signs whole transactions, never bare digests.
    async fn sign(&self, _hash: &B256) -> ThorResult<[u8; SIGNATURE_LENGTH]> {
        Err(ThorError::Signing(
            "Remote delegator can only sign as delegator".to_string(),
        ))
    }

    async fn sign_as_delegator(
        &self,
        tx: &Transaction,
        origin: &Address,
    ) -> ThorResult<[u8; SIGNATURE_LENGTH]> {
        let signature = self.request_signature(tx, origin).await?;
        let signature: [u8; SIGNATURE_LENGTH] = signature.as_slice().try_into().map_err(|_| {
            ThorError::InvalidSignature(format!(
                "Delegator signature must be {} bytes, got {}",
                SIGNATURE_LENGTH,
                signature.len()
            ))
        })?;

        let signer = recover_address(&tx.delegator_signing_hash(origin), &signature)?;
        if signer != self.gas_payer {
            tracing::warn!(
                expected = %self.gas_payer,
                actual = %signer,
                "Delegation service signed with an unexpected key"
            );
            return Err(ThorError::Signing(format!(
                "Delegator signature recovers to {}, expected {}",
                signer, self.gas_payer
            )));
        }

        tracing::debug!(gas_payer = %self.gas_payer, origin = %origin, "Delegator signature received");
        Ok(signature)
    }
}

impl std::fmt::Debug for RemoteDelegator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDelegator")
            .field("url", &self.url)
            .field("gas_payer", &self.gas_payer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url() {
        let result = RemoteDelegator::new("no scheme", Address::ZERO, Duration::from_secs(1));
        assert!(matches!(result, Err(ThorError::Signing(_))));
    }

    #[tokio::test]
    async fn test_bare_digest_signing_refused() {
        let delegator =
            RemoteDelegator::new("http://127.0.0.1:1/sign", Address::ZERO, Duration::from_secs(1))
                .unwrap();
        let result = delegator.sign(&B256::ZERO).await;
        assert!(matches!(result, Err(ThorError::Signing(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = DelegationRequest {
            origin: Address::repeat_byte(0x11),
            raw: "0xc0".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["origin"], format!("0x{}", "11".repeat(20)));
        assert_eq!(json["raw"], "0xc0");
    }
}
