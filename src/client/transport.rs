//! The query capability the core consumes.

use alloy::primitives::B256;
use async_trait::async_trait;

use crate::client::types::{
    Block, BlockRevision, InspectRequest, InspectResponse, TransactionReceipt,
};
use crate::error::ThorResult;

/// Request/response access to one logical Thor node.
#[async_trait]
pub trait NodeTransport: Send + Sync {
    /// Chain tag of the connected network.
    fn chain_tag(&self) -> u8;

    /// Look up a block; `Ok(None)` if it does not exist (yet).
    async fn block(&self, revision: BlockRevision) -> ThorResult<Option<Block>>;

    /// Dry-run the clauses and report per-clause results.
    async fn inspect(&self, request: &InspectRequest) -> ThorResult<Vec<InspectResponse>>;

    /// Submit a `0x`-prefixed encoded transaction; returns its ID.
    async fn send_raw(&self, raw: &str) -> ThorResult<B256>;

    /// Receipt of an included transaction; `Ok(None)` while pending.
    async fn receipt(&self, id: &B256) -> ThorResult<Option<TransactionReceipt>>;
}
