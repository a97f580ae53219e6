//! In-memory transport for unit tests.

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::client::transport::NodeTransport;
use crate::client::types::{
    Block, BlockRevision, InspectRequest, InspectResponse, ReceiptMeta, TransactionReceipt,
};
use crate::error::{ThorError, ThorResult};

pub(crate) struct MockTransport {
    pub chain_tag: u8,
    pub best: Mutex<Option<Block>>,
    /// `None` makes `inspect` fail with a transport error. An empty list
    /// answers one zero-gas success per requested clause.
    pub inspect_results: Mutex<Option<Vec<InspectResponse>>>,
    pub inspect_requests: Mutex<Vec<InspectRequest>>,
    /// Receipt is returned from this call number on (1-based); `None` never.
    pub receipt_from_call: Option<u32>,
    /// The first N receipt calls fail with a transport error.
    pub receipt_failures: u32,
    pub receipt_reverted: bool,
    pub sent: Mutex<Vec<String>>,
    pub block_calls: AtomicU32,
    pub inspect_calls: AtomicU32,
    pub receipt_calls: AtomicU32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            chain_tag: 0x27,
            best: Mutex::new(Some(block_at(100, unix_now()))),
            inspect_results: Mutex::new(Some(Vec::new())),
            inspect_requests: Mutex::new(Vec::new()),
            receipt_from_call: None,
            receipt_failures: 0,
            receipt_reverted: false,
            sent: Mutex::new(Vec::new()),
            block_calls: AtomicU32::new(0),
            inspect_calls: AtomicU32::new(0),
            receipt_calls: AtomicU32::new(0),
        }
    }

    pub fn with_inspect(self, results: Option<Vec<InspectResponse>>) -> Self {
        *self.inspect_results.lock().unwrap() = results;
        self
    }

    pub fn with_best(self, block: Option<Block>) -> Self {
        *self.best.lock().unwrap() = block;
        self
    }

    pub fn with_receipt_from_call(mut self, call: u32) -> Self {
        self.receipt_from_call = Some(call);
        self
    }

    pub fn block_calls(&self) -> u32 {
        self.block_calls.load(Ordering::SeqCst)
    }

    pub fn inspect_calls(&self) -> u32 {
        self.inspect_calls.load(Ordering::SeqCst)
    }

    pub fn receipt_calls(&self) -> u32 {
        self.receipt_calls.load(Ordering::SeqCst)
    }
}

pub(crate) use crate::client::blocks::unix_now;

pub(crate) fn block_at(number: u32, timestamp: u64) -> Block {
    let mut id = [0x11u8; 32];
    id[..4].copy_from_slice(&number.to_be_bytes());
    Block {
        number: number as u64,
        id: B256::from(id),
        timestamp,
        gas_limit: 10_000_000,
        is_trunk: true,
        ..Default::default()
    }
}

pub(crate) fn clause_result(gas_used: u64, reverted: bool, vm_error: &str) -> InspectResponse {
    InspectResponse {
        gas_used,
        reverted,
        vm_error: vm_error.to_string(),
        ..Default::default()
    }
}

pub(crate) fn receipt_for(id: B256, reverted: bool) -> TransactionReceipt {
    TransactionReceipt {
        gas_used: 21000,
        gas_payer: Address::ZERO,
        paid: U256::from(1u64),
        reward: U256::ZERO,
        reverted,
        meta: ReceiptMeta {
            block_id: B256::repeat_byte(0x22),
            block_number: 101,
            block_timestamp: unix_now(),
            tx_id: id,
            tx_origin: Address::ZERO,
        },
        outputs: Vec::new(),
    }
}

#[async_trait]
impl NodeTransport for MockTransport {
    fn chain_tag(&self) -> u8 {
        self.chain_tag
    }

    async fn block(&self, revision: BlockRevision) -> ThorResult<Option<Block>> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        match revision {
            BlockRevision::Best | BlockRevision::Finalized => Ok(self.best.lock().unwrap().clone()),
            BlockRevision::Number(n) => Ok(self
                .best
                .lock()
                .unwrap()
                .clone()
                .filter(|b| b.number == n)),
            BlockRevision::Id(id) => Ok(self.best.lock().unwrap().clone().filter(|b| b.id == id)),
        }
    }

    async fn inspect(&self, request: &InspectRequest) -> ThorResult<Vec<InspectResponse>> {
        self.inspect_calls.fetch_add(1, Ordering::SeqCst);
        self.inspect_requests.lock().unwrap().push(request.clone());
        let results = self
            .inspect_results
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ThorError::Transport("connection refused".to_string()))?;
        if results.is_empty() {
            return Ok(request
                .clauses
                .iter()
                .map(|_| clause_result(0, false, ""))
                .collect());
        }
        Ok(results)
    }

    async fn send_raw(&self, raw: &str) -> ThorResult<B256> {
        self.sent.lock().unwrap().push(raw.to_string());
        let tx = crate::transaction::Transaction::from_hex(raw)?;
        tx.id()
    }

    async fn receipt(&self, id: &B256) -> ThorResult<Option<TransactionReceipt>> {
        let call = self.receipt_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.receipt_failures {
            return Err(ThorError::Transport("connection reset".to_string()));
        }
        match self.receipt_from_call {
            Some(from) if call >= from => Ok(Some(receipt_for(*id, self.receipt_reverted))),
            _ => Ok(None),
        }
    }
}
