//! Fluent front end over [`TxOptions`] and [`build`].

use alloy::primitives::{Address, B256};

use crate::builder::options::{build, ChainContext, TxOptions};
use crate::confirm::PendingTx;
use crate::error::ThorResult;
use crate::gas::Simulation;
use crate::signer::{sign_transaction, TxSigner};
use crate::thor::Thor;
use crate::transaction::{BlockRef, Clause, Transaction};

/// Clauses plus options, ready to simulate, build or send.
#[derive(Debug, Clone)]
pub struct Transactor<'a> {
    thor: &'a Thor,
    clauses: Vec<Clause>,
    options: TxOptions,
}

impl<'a> Transactor<'a> {
    pub fn new(thor: &'a Thor, clauses: Vec<Clause>, options: TxOptions) -> Self {
        Self {
            thor,
            clauses,
            options,
        }
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.options.gas = Some(gas);
        self
    }

    pub fn gas_price_coef(mut self, coef: u8) -> Self {
        self.options.gas_price_coef = coef;
        self
    }

    pub fn expiration(mut self, blocks: u32) -> Self {
        self.options.expiration = Some(blocks);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.options.nonce = Some(nonce);
        self
    }

    pub fn block_ref(mut self, block_ref: BlockRef) -> Self {
        self.options.block_ref = Some(block_ref);
        self
    }

    pub fn depends_on(mut self, id: B256) -> Self {
        self.options.depends_on = Some(id);
        self
    }

    /// Mark the transaction as paid for by a delegator.
    pub fn delegate(mut self) -> Self {
        self.options.features = self.options.features.with_delegated(true);
        self
    }

    /// Gas payer assumed when simulating.
    pub fn gas_payer(mut self, payer: Address) -> Self {
        self.options.gas_payer = Some(payer);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn options(&self) -> &TxOptions {
        &self.options
    }

    /// Dry-run the clauses as `caller`.
    pub async fn simulate(&self, caller: Address) -> ThorResult<Simulation> {
        self.thor
            .simulate(&self.clauses, caller, self.options.gas_payer)
            .await
    }

    /// Build the unsigned transaction for `caller`.
    pub async fn build(&self, caller: Address) -> ThorResult<Transaction> {
        build(&self.clauses, &self.options, caller, self.thor).await
    }

    /// Build, sign and submit.
    ///
    /// Passing a delegator turns on the delegation feature and makes the
    /// delegator the simulated gas payer unless one was set.
    pub async fn send(
        &self,
        origin: &dyn TxSigner,
        delegator: Option<&dyn TxSigner>,
    ) -> ThorResult<PendingTx> {
        let mut options = self.options.clone();
        if let Some(delegator) = delegator {
            options.features = options.features.with_delegated(true);
            options.gas_payer = options.gas_payer.or(Some(delegator.address()));
        }

        let tx = build(&self.clauses, &options, origin.address(), self.thor).await?;
        let signed = sign_transaction(&tx, origin, delegator).await?;
        self.thor.send(&signed).await
    }
}
