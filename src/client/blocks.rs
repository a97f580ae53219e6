//! Block lookups with a short-lived best-block cache.
//!
//! # Design Decisions
//! - One cached value, last write wins; concurrent refreshes are harmless
//! - The cached best block is reused only while it is younger than
//!   [`BEST_BLOCK_MAX_AGE`] by its own timestamp

use alloy::primitives::B256;
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::client::transport::NodeTransport;
use crate::client::types::{Block, BlockRevision};
use crate::error::{ThorError, ThorResult};

/// Target interval between two blocks.
pub const BLOCK_INTERVAL: Duration = Duration::from_secs(10);

/// Maximum age of a cached best block.
pub const BEST_BLOCK_MAX_AGE: Duration = Duration::from_secs(10);

/// Block access for one node transport.
pub struct Blocks {
    transport: Arc<dyn NodeTransport>,
    best: ArcSwapOption<Block>,
}

impl Blocks {
    pub fn new(transport: Arc<dyn NodeTransport>) -> Self {
        Self {
            transport,
            best: ArcSwapOption::empty(),
        }
    }

    /// Get the best block, from cache when still fresh.
    pub async fn best(&self) -> ThorResult<Block> {
        if let Some(cached) = self.best.load_full() {
            if is_fresh(&cached, unix_now()) {
                return Ok(cached.as_ref().clone());
            }
        }

        let block = self.require(BlockRevision::Best).await?;
        tracing::debug!(number = block.number, id = %block.id, "Best block refreshed");
        self.best.store(Some(Arc::new(block.clone())));
        Ok(block)
    }

    /// Get the latest finalized block.
    pub async fn finalized(&self) -> ThorResult<Block> {
        self.require(BlockRevision::Finalized).await
    }

    pub async fn by_number(&self, number: u64) -> ThorResult<Option<Block>> {
        self.transport.block(BlockRevision::Number(number)).await
    }

    pub async fn by_id(&self, id: &B256) -> ThorResult<Option<Block>> {
        self.transport.block(BlockRevision::Id(*id)).await
    }

    /// Drop the cached best block.
    pub fn invalidate(&self) {
        self.best.store(None);
    }

    async fn require(&self, revision: BlockRevision) -> ThorResult<Block> {
        self.transport
            .block(revision)
            .await?
            .ok_or_else(|| ThorError::Transport(format!("Block '{}' not found", revision)))
    }
}

impl std::fmt::Debug for Blocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blocks")
            .field("cached_best", &self.best.load_full().map(|b| b.number))
            .finish()
    }
}

/// Whether `block` is recent enough to stand in for the best block.
pub fn is_fresh(block: &Block, now_secs: u64) -> bool {
    now_secs.saturating_sub(block.timestamp) < BEST_BLOCK_MAX_AGE.as_secs()
}

/// Predicted time until the block after `block` is produced.
///
/// Zero if that block is already due.
pub fn until_next_block(block: &Block, now_secs: u64) -> Duration {
    let next = block.timestamp.saturating_add(BLOCK_INTERVAL.as_secs());
    Duration::from_secs(next.saturating_sub(now_secs))
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
