//! Error taxonomy shared by every subsystem.

use alloy::primitives::B256;
use thiserror::Error;

/// Errors that can occur while building, signing, submitting or confirming
/// a transaction.
#[derive(Debug, Error)]
pub enum ThorError {
    /// Binary decoding failed (truncated input, bad prefix, non-canonical value).
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Signature is missing, has the wrong length or cannot be recovered.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Intrinsic gas does not fit the wire representation.
    #[error("Intrinsic gas overflow")]
    GasOverflow,

    /// Dry-run execution could not be performed.
    #[error("Simulation failed: {0}")]
    SimulationFailed(String),

    /// Receipt was not observed within the polling budget.
    ///
    /// The transaction may still be included later.
    #[error("Transaction {tx_id} not confirmed after {attempts} attempts")]
    ConfirmationTimeout { tx_id: B256, attempts: u32 },

    /// Connection, request or decoding failure talking to a node.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Node answered with a non-success HTTP status.
    #[error("Node returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Node request timed out.
    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    /// A signer refused or failed to sign.
    #[error("Signing error: {0}")]
    Signing(String),
}

impl ThorError {
    /// Whether another node may succeed where this one failed.
    pub fn is_failover(&self) -> bool {
        match self {
            ThorError::Transport(_) | ThorError::Timeout(_) => true,
            ThorError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<alloy::rlp::Error> for ThorError {
    fn from(err: alloy::rlp::Error) -> Self {
        ThorError::MalformedEncoding(err.to_string())
    }
}

/// Result type for transaction operations.
pub type ThorResult<T> = Result<T, ThorError>;
