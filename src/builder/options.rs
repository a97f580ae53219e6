//! Build options and default resolution.

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::ThorResult;
use crate::gas::Simulation;
use crate::transaction::{BlockRef, Clause, Features, Transaction, TxBody};

/// Expiration used when none is given, in blocks.
pub const DEFAULT_EXPIRATION: u32 = 30;

/// Caller-provided transaction settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOptions {
    pub gas_price_coef: u8,
    pub features: Features,
    pub depends_on: Option<B256>,
    /// Gas limit; simulated when unset.
    pub gas: Option<u64>,
    /// Defaults to the current best block.
    pub block_ref: Option<BlockRef>,
    /// Defaults to [`ChainContext::default_expiration`].
    pub expiration: Option<u32>,
    /// Defaults to a random value from the OS generator.
    pub nonce: Option<u64>,
    /// Gas payer assumed during simulation.
    pub gas_payer: Option<Address>,
}

/// Network effects needed to fill in defaults.
#[async_trait]
pub trait ChainContext: Send + Sync {
    fn chain_tag(&self) -> u8;

    async fn best_block_ref(&self) -> ThorResult<BlockRef>;

    async fn simulate(
        &self,
        clauses: &[Clause],
        caller: Address,
        gas_payer: Option<Address>,
    ) -> ThorResult<Simulation>;

    fn default_expiration(&self) -> u32 {
        DEFAULT_EXPIRATION
    }
}

/// Build an unsigned transaction, resolving unset options.
///
/// Gas is simulated first, then the block reference is fetched; any failure
/// aborts the build.
pub async fn build(
    clauses: &[Clause],
    options: &TxOptions,
    caller: Address,
    ctx: &dyn ChainContext,
) -> ThorResult<Transaction> {
    let gas = match options.gas {
        Some(gas) => gas,
        None => {
            let simulation = ctx.simulate(clauses, caller, options.gas_payer).await?;
            if !simulation.is_success() {
                tracing::warn!(
                    caller = %caller,
                    vm_error = simulation.vm_error(),
                    "Simulation reverted, building anyway"
                );
            }
            simulation.total_gas()?
        }
    };

    let block_ref = match options.block_ref {
        Some(block_ref) => block_ref,
        None => ctx.best_block_ref().await?,
    };

    let expiration = options
        .expiration
        .unwrap_or_else(|| ctx.default_expiration());
    let nonce = options.nonce.unwrap_or_else(random_nonce);

    Ok(Transaction::new(TxBody {
        chain_tag: ctx.chain_tag(),
        block_ref,
        expiration,
        clauses: clauses.to_vec(),
        gas_price_coef: options.gas_price_coef,
        gas,
        depends_on: options.depends_on,
        nonce,
        features: options.features,
    }))
}

fn random_nonce() -> u64 {
    OsRng.next_u64()
}
