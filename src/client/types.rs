//! JSON wire types of the Thor REST API.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transaction::{BlockRef, Clause};

/// Block selector used in `/blocks/{revision}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRevision {
    Best,
    Finalized,
    Number(u64),
    Id(B256),
}

impl fmt::Display for BlockRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRevision::Best => write!(f, "best"),
            BlockRevision::Finalized => write!(f, "finalized"),
            BlockRevision::Number(n) => write!(f, "{}", n),
            BlockRevision::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Block header as returned by the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: u64,
    pub id: B256,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "parentID", default)]
    pub parent_id: B256,
    pub timestamp: u64,
    pub gas_limit: u64,
    #[serde(default)]
    pub beneficiary: Address,
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub total_score: u64,
    #[serde(default)]
    pub is_trunk: bool,
    #[serde(default)]
    pub is_finalized: bool,
    #[serde(default)]
    pub transactions: Vec<B256>,
}

impl Block {
    /// Chain tag derived from this block's ID (meaningful for genesis).
    pub fn chain_tag(&self) -> u8 {
        self.id[31]
    }

    pub fn block_ref(&self) -> BlockRef {
        BlockRef::from_id(&self.id)
    }
}

/// Dry-run request for `POST /accounts/*`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectRequest {
    pub clauses: Vec<Clause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proved_work: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_payer: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_ref: Option<BlockRef>,
}

/// Dry-run result of one clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectResponse {
    #[serde(default)]
    pub data: Bytes,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
    pub gas_used: u64,
    pub reverted: bool,
    #[serde(default)]
    pub vm_error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub sender: Address,
    pub recipient: Address,
    pub amount: U256,
}

/// Per-clause execution output in a receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptMeta {
    #[serde(rename = "blockID")]
    pub block_id: B256,
    pub block_number: u64,
    pub block_timestamp: u64,
    #[serde(rename = "txID")]
    pub tx_id: B256,
    pub tx_origin: Address,
}

/// Post-execution record of an included transaction.
///
/// `reverted` is data for the caller; a reverted transaction still has a
/// receipt and still paid for gas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub gas_used: u64,
    pub gas_payer: Address,
    pub paid: U256,
    pub reward: U256,
    pub reverted: bool,
    pub meta: ReceiptMeta,
    #[serde(default)]
    pub outputs: Vec<Output>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTransactionResponse {
    pub id: B256,
}

/// Body of `POST /transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub raw: String,
}
