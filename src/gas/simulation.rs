//! Dry-run gas estimation.

use alloy::primitives::Address;

use crate::client::{InspectRequest, InspectResponse, NodeTransport};
use crate::error::{ThorError, ThorResult};
use crate::gas::intrinsic::intrinsic_gas;
use crate::observability::metrics;
use crate::transaction::Clause;

/// Outcome of a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    consumed_gas: u64,
    intrinsic_gas: u64,
    reverted: bool,
    vm_error: String,
    outputs: Vec<InspectResponse>,
}

impl Simulation {
    /// Gas consumed by execution, summed over all clauses.
    pub fn consumed_gas(&self) -> u64 {
        self.consumed_gas
    }

    pub fn intrinsic_gas(&self) -> u64 {
        self.intrinsic_gas
    }

    /// Gas to put on the transaction: intrinsic plus consumed.
    pub fn total_gas(&self) -> ThorResult<u64> {
        self.intrinsic_gas
            .checked_add(self.consumed_gas)
            .ok_or(ThorError::GasOverflow)
    }

    /// Whether the last clause reverted.
    pub fn reverted(&self) -> bool {
        self.reverted
    }

    /// VM error of the last clause, empty if none.
    pub fn vm_error(&self) -> &str {
        &self.vm_error
    }

    pub fn is_success(&self) -> bool {
        !self.reverted && self.vm_error.is_empty()
    }

    /// Per-clause results in clause order.
    pub fn outputs(&self) -> &[InspectResponse] {
        &self.outputs
    }
}

/// Dry-run `clauses` as `caller`, optionally with a separate gas payer.
///
/// Intrinsic gas is computed first, so an overflowing clause set never
/// reaches the node.
pub async fn simulate(
    transport: &dyn NodeTransport,
    clauses: &[Clause],
    caller: Address,
    gas_payer: Option<Address>,
) -> ThorResult<Simulation> {
    let intrinsic_gas = intrinsic_gas(clauses)?;

    let request = InspectRequest {
        clauses: clauses.to_vec(),
        caller: Some(caller),
        gas_payer,
        ..Default::default()
    };

    let outputs = transport.inspect(&request).await.map_err(|e| {
        tracing::warn!(caller = %caller, error = %e, "Simulation request failed");
        metrics::record_simulation(false);
        ThorError::SimulationFailed(e.to_string())
    })?;

    if outputs.len() != clauses.len() {
        tracing::warn!(
            caller = %caller,
            clauses = clauses.len(),
            results = outputs.len(),
            "Simulation result count does not match clauses"
        );
        metrics::record_simulation(false);
        return Err(ThorError::SimulationFailed(format!(
            "expected {} clause results, node returned {}",
            clauses.len(),
            outputs.len()
        )));
    }

    let consumed_gas = outputs
        .iter()
        .try_fold(0u64, |total, output| total.checked_add(output.gas_used))
        .ok_or(ThorError::GasOverflow)?;

    // Only the final clause decides the outcome.
    let (reverted, vm_error) = outputs
        .last()
        .map(|last| (last.reverted, last.vm_error.clone()))
        .unwrap_or_default();

    tracing::debug!(
        caller = %caller,
        clauses = clauses.len(),
        consumed_gas,
        intrinsic_gas,
        reverted,
        "Simulation finished"
    );
    metrics::record_simulation(true);

    Ok(Simulation {
        consumed_gas,
        intrinsic_gas,
        reverted,
        vm_error,
        outputs,
    })
}
