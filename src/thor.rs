//! Entry point tying the transport, block cache and builder together.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use std::sync::Arc;

use crate::builder::{ChainContext, Transactor, TxOptions, DEFAULT_EXPIRATION};
use crate::client::{Blocks, HttpClient, NodeTransport, TransactionReceipt};
use crate::config::{NodeConfig, TransactionsConfig};
use crate::confirm::PendingTx;
use crate::error::{ThorError, ThorResult};
use crate::gas::{simulate, Simulation};
use crate::observability::metrics;
use crate::transaction::{BlockRef, Clause, Transaction};

/// Client-side handle to one Thor network.
#[derive(Clone)]
pub struct Thor {
    transport: Arc<dyn NodeTransport>,
    blocks: Arc<Blocks>,
    expiration: u32,
    gas_price_coef: u8,
}

impl Thor {
    pub fn new(transport: Arc<dyn NodeTransport>) -> Self {
        Self {
            blocks: Arc::new(Blocks::new(transport.clone())),
            transport,
            expiration: DEFAULT_EXPIRATION,
            gas_price_coef: 0,
        }
    }

    /// Connect over HTTP to the configured nodes.
    pub async fn connect(config: &NodeConfig) -> ThorResult<Self> {
        let client = HttpClient::connect(config).await?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Apply configured transaction defaults.
    pub fn with_defaults(mut self, defaults: &TransactionsConfig) -> Self {
        self.expiration = defaults.expiration;
        self.gas_price_coef = defaults.gas_price_coef;
        self
    }

    pub fn transport(&self) -> &Arc<dyn NodeTransport> {
        &self.transport
    }

    pub fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    /// Start a transaction over `clauses`.
    pub fn transactor(&self, clauses: Vec<Clause>) -> Transactor<'_> {
        let options = TxOptions {
            gas_price_coef: self.gas_price_coef,
            ..Default::default()
        };
        Transactor::new(self, clauses, options)
    }

    /// Submit a signed transaction.
    pub async fn send(&self, tx: &Transaction) -> ThorResult<PendingTx> {
        if !tx.is_signed() {
            return Err(ThorError::InvalidSignature(
                "Cannot submit an unsigned transaction".to_string(),
            ));
        }

        let id = match self.transport.send_raw(&tx.encoded_hex()).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Transaction rejected");
                metrics::record_submission(false);
                return Err(e);
            }
        };

        tracing::info!(tx_id = %id, delegated = tx.is_delegated(), "Transaction submitted");
        metrics::record_submission(true);
        Ok(self.pending(id))
    }

    /// Handle to an already submitted transaction.
    pub fn pending(&self, id: B256) -> PendingTx {
        PendingTx::new(id, self.transport.clone(), self.blocks.clone())
    }

    pub async fn receipt(&self, id: &B256) -> ThorResult<Option<TransactionReceipt>> {
        self.transport.receipt(id).await
    }
}

#[async_trait]
impl ChainContext for Thor {
    fn chain_tag(&self) -> u8 {
        self.transport.chain_tag()
    }

    async fn best_block_ref(&self) -> ThorResult<BlockRef> {
        Ok(self.blocks.best().await?.block_ref())
    }

    async fn simulate(
        &self,
        clauses: &[Clause],
        caller: Address,
        gas_payer: Option<Address>,
    ) -> ThorResult<Simulation> {
        simulate(self.transport.as_ref(), clauses, caller, gas_payer).await
    }

    fn default_expiration(&self) -> u32 {
        self.expiration
    }
}

impl std::fmt::Debug for Thor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thor")
            .field("chain_tag", &self.transport.chain_tag())
            .field("expiration", &self.expiration)
            .field("gas_price_coef", &self.gas_price_coef)
            .finish()
    }
}
