//! Intrinsic gas: the cost of a transaction before any execution.

use crate::error::{ThorError, ThorResult};
use crate::transaction::Clause;

/// Base cost of every transaction.
pub const TX_GAS: u64 = 5_000;
/// Cost of a call or transfer clause.
pub const CLAUSE_GAS: u64 = 21_000 - TX_GAS;
/// Cost of a contract-creation clause.
pub const CLAUSE_GAS_CONTRACT_CREATION: u64 = 53_000 - TX_GAS;
/// Cost per zero byte of clause data.
pub const TX_DATA_ZERO_GAS: u64 = 4;
/// Cost per non-zero byte of clause data.
pub const TX_DATA_NON_ZERO_GAS: u64 = 68;

/// Compute the intrinsic gas of a clause set.
///
/// An empty clause list is priced like a single call clause.
pub fn intrinsic_gas(clauses: &[Clause]) -> ThorResult<u64> {
    if clauses.is_empty() {
        return Ok(TX_GAS + CLAUSE_GAS);
    }

    clauses.iter().try_fold(TX_GAS, |total, clause| {
        let clause_gas = if clause.is_creating_contract() {
            CLAUSE_GAS_CONTRACT_CREATION
        } else {
            CLAUSE_GAS
        };
        add(add(total, clause_gas)?, data_gas(clause.data())?)
    })
}

fn data_gas(data: &[u8]) -> ThorResult<u64> {
    let zeros = data.iter().filter(|b| **b == 0).count() as u64;
    priced_data(zeros, data.len() as u64 - zeros)
}

fn priced_data(zeros: u64, non_zeros: u64) -> ThorResult<u64> {
    let zero_gas = zeros
        .checked_mul(TX_DATA_ZERO_GAS)
        .ok_or(ThorError::GasOverflow)?;
    let non_zero_gas = non_zeros
        .checked_mul(TX_DATA_NON_ZERO_GAS)
        .ok_or(ThorError::GasOverflow)?;
    add(zero_gas, non_zero_gas)
}

fn add(a: u64, b: u64) -> ThorResult<u64> {
    a.checked_add(b).ok_or(ThorError::GasOverflow)
}
