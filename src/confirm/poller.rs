//! The poll loop and the handle of a submitted transaction.

use alloy::primitives::B256;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

use crate::client::blocks::{unix_now, until_next_block, BLOCK_INTERVAL};
use crate::client::{Blocks, NodeTransport, TransactionReceipt};
use crate::confirm::policy::{PollPolicy, DEFAULT_WAIT_BLOCKS};
use crate::error::{ThorError, ThorResult};
use crate::observability::metrics;

/// Poll budget ran out without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted {
    pub attempts: u32,
}

/// Call `probe` until it yields a value or `policy` is exhausted.
///
/// `Ok(None)` and errors from the probe both count as "try again". With a
/// deadline, a probe still running when it passes is abandoned.
pub async fn poll<T, F, Fut>(policy: &PollPolicy, mut probe: F) -> Result<T, Exhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ThorResult<Option<T>>>,
{
    let deadline = policy.deadline.map(|d| Instant::now() + d);
    let bounded = |pause: Duration| match deadline {
        Some(at) => pause.min(at.saturating_duration_since(Instant::now())),
        None => pause,
    };

    if !policy.initial_delay.is_zero() {
        sleep(bounded(policy.initial_delay)).await;
    }

    let mut attempts = 0u32;
    while attempts < policy.max_attempts {
        attempts += 1;
        let outcome = match deadline {
            Some(at) => timeout(at.saturating_duration_since(Instant::now()), probe()).await,
            None => Ok(probe().await),
        };
        match outcome {
            Ok(Ok(Some(value))) => return Ok(value),
            Ok(Ok(None)) => tracing::debug!(attempt = attempts, "Not available yet"),
            Ok(Err(e)) => tracing::warn!(attempt = attempts, error = %e, "Poll attempt failed"),
            Err(_) => tracing::warn!(attempt = attempts, "Poll attempt cut off by deadline"),
        }

        if attempts >= policy.max_attempts {
            break;
        }
        if let Some(at) = deadline {
            if Instant::now() >= at {
                break;
            }
        }
        sleep(bounded(policy.next_pause())).await;
    }

    Err(Exhausted { attempts })
}

/// A submitted transaction awaiting inclusion.
#[derive(Clone)]
pub struct PendingTx {
    id: B256,
    transport: Arc<dyn NodeTransport>,
    blocks: Arc<Blocks>,
}

impl PendingTx {
    pub fn new(id: B256, transport: Arc<dyn NodeTransport>, blocks: Arc<Blocks>) -> Self {
        Self {
            id,
            transport,
            blocks,
        }
    }

    /// Get the transaction ID reported by the node.
    pub fn id(&self) -> B256 {
        self.id
    }

    /// Look up the receipt once.
    pub async fn receipt(&self) -> ThorResult<Option<TransactionReceipt>> {
        self.transport.receipt(&self.id).await
    }

    /// Wait for the receipt over the next six blocks.
    ///
    /// Checks once immediately, then once per block starting at the
    /// predicted arrival of the block after the current best.
    pub async fn wait(&self) -> ThorResult<TransactionReceipt> {
        self.wait_from_next_block(PollPolicy::blocks(DEFAULT_WAIT_BLOCKS)).await
    }

    /// Like [`wait`](Self::wait), with the block budget, jitter and deadline
    /// taken from `policy`.
    pub async fn wait_from_next_block(
        &self,
        policy: PollPolicy,
    ) -> ThorResult<TransactionReceipt> {
        match self.receipt().await {
            Ok(Some(receipt)) => {
                metrics::record_confirmation(true, 1);
                return Ok(receipt);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(tx_id = %self.id, error = %e, "Receipt lookup failed"),
        }

        let first_poll = match self.blocks.best().await {
            Ok(best) => until_next_block(&best, unix_now()),
            Err(e) => {
                tracing::warn!(
                    tx_id = %self.id,
                    error = %e,
                    "Best block unavailable, polling per block interval"
                );
                BLOCK_INTERVAL
            }
        };

        self.run(&policy.with_initial_delay(first_poll), 1).await
    }

    /// Wait for the receipt until `timeout` has elapsed.
    pub async fn wait_for(&self, timeout: Duration) -> ThorResult<TransactionReceipt> {
        self.run(&PollPolicy::duration(timeout), 0).await
    }

    /// Wait for the receipt under a custom policy.
    pub async fn wait_with(&self, policy: &PollPolicy) -> ThorResult<TransactionReceipt> {
        self.run(policy, 0).await
    }

    async fn run(&self, policy: &PollPolicy, prior_attempts: u32) -> ThorResult<TransactionReceipt> {
        tracing::debug!(tx_id = %self.id, policy = ?policy, "Waiting for receipt");

        match poll(policy, || self.receipt()).await {
            Ok(receipt) => {
                tracing::info!(
                    tx_id = %self.id,
                    block_number = receipt.meta.block_number,
                    reverted = receipt.reverted,
                    "Transaction confirmed"
                );
                metrics::record_confirmation(true, prior_attempts + 1);
                Ok(receipt)
            }
            Err(exhausted) => {
                let attempts = prior_attempts + exhausted.attempts;
                tracing::warn!(tx_id = %self.id, attempts, "Transaction not confirmed in time");
                metrics::record_confirmation(false, attempts);
                Err(ThorError::ConfirmationTimeout {
                    tx_id: self.id,
                    attempts,
                })
            }
        }
    }
}

impl std::fmt::Debug for PendingTx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTx").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn pending(transport: MockTransport) -> (PendingTx, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        let blocks = Arc::new(Blocks::new(transport.clone()));
        (
            PendingTx::new(B256::repeat_byte(0x77), transport.clone(), blocks),
            transport,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_returns_first_value() {
        let calls = AtomicU32::new(0);
        let policy = PollPolicy::blocks(5).with_interval(Duration::from_secs(1));

        let value = poll(&policy, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(if n == 3 { Some(n) } else { None }) }
        })
        .await
        .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_respects_attempt_budget() {
        let calls = AtomicU32::new(0);
        let policy = PollPolicy::blocks(4);
        let start = Instant::now();

        let result: Result<(), _> = poll(&policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(None) }
        })
        .await;

        assert_eq!(result, Err(Exhausted { attempts: 4 }));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // Three pauses between four attempts
        assert_eq!(start.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_respects_deadline() {
        let policy = PollPolicy::duration(Duration::from_millis(1_200));
        let start = Instant::now();

        let result: Result<(), _> = poll(&policy, || async { Ok(None) }).await;

        // Attempts at 0, 500, 1000 and 1200 ms
        assert_eq!(result, Err(Exhausted { attempts: 4 }));
        assert_eq!(start.elapsed(), Duration::from_millis(1_200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_retries_errors() {
        let calls = AtomicU32::new(0);
        let policy = PollPolicy::duration(Duration::from_secs(5));

        let value = poll(&policy, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(ThorError::Transport("connection reset".into()))
                } else {
                    Ok(Some("done"))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, "done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_delay_is_bounded_by_deadline() {
        let policy = PollPolicy::duration(Duration::from_secs(1))
            .with_initial_delay(Duration::from_secs(60));
        let start = Instant::now();

        let result: Result<(), _> = poll(&policy, || async { Ok(None) }).await;

        assert_eq!(result, Err(Exhausted { attempts: 1 }));
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_cuts_off_slow_probe_at_deadline() {
        let policy = PollPolicy::duration(Duration::from_secs(1));
        let start = Instant::now();

        let result: Result<(), _> = poll(&policy, || async {
            sleep(Duration::from_secs(8)).await;
            Ok(None)
        })
        .await;

        assert_eq!(result, Err(Exhausted { attempts: 1 }));
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_without_deadline_lets_probe_finish() {
        let policy = PollPolicy::blocks(1);
        let start = Instant::now();

        let value = poll(&policy, || async {
            sleep(Duration::from_secs(30)).await;
            Ok(Some(1u8))
        })
        .await
        .unwrap();

        assert_eq!(value, 1);
        assert_eq!(start.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_times_out() {
        let (tx, transport) = pending(MockTransport::new());
        let start = Instant::now();

        let result = tx.wait_for(Duration::from_secs(2)).await;

        match result {
            Err(ThorError::ConfirmationTimeout { tx_id, attempts }) => {
                assert_eq!(tx_id, tx.id());
                assert_eq!(attempts, transport.receipt_calls());
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed <= Duration::from_millis(2_500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_returns_reverted_receipt() {
        let mut mock = MockTransport::new().with_receipt_from_call(3);
        mock.receipt_reverted = true;
        let (tx, transport) = pending(mock);

        let receipt = tx.wait_for(Duration::from_secs(10)).await.unwrap();
        assert!(receipt.reverted);
        assert_eq!(receipt.meta.tx_id, tx.id());
        assert_eq!(transport.receipt_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_immediate_receipt() {
        let (tx, transport) = pending(MockTransport::new().with_receipt_from_call(1));

        tx.wait().await.unwrap();
        assert_eq!(transport.receipt_calls(), 1);
        assert_eq!(transport.block_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_gives_up_after_six_blocks() {
        let (tx, transport) = pending(MockTransport::new());

        let result = tx.wait().await;
        assert!(matches!(
            result,
            Err(ThorError::ConfirmationTimeout { attempts: 7, .. })
        ));
        assert_eq!(transport.receipt_calls(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_survives_transport_errors() {
        let mut mock = MockTransport::new().with_receipt_from_call(4);
        mock.receipt_failures = 2;
        let (tx, _) = pending(mock);

        assert!(tx.wait().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_from_next_block_honours_deadline() {
        let (tx, transport) = pending(MockTransport::new().with_best(None));
        let policy = PollPolicy::blocks(6).with_deadline(Duration::from_secs(25));
        let start = Instant::now();

        let result = tx.wait_from_next_block(policy).await;

        // Immediate check, then attempts at 10, 20 and 25 seconds
        assert!(matches!(
            result,
            Err(ThorError::ConfirmationTimeout { attempts: 4, .. })
        ));
        assert_eq!(transport.receipt_calls(), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(25));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_keeps_polling_without_best_block() {
        let mock = MockTransport::new()
            .with_best(None)
            .with_receipt_from_call(2);
        let (tx, transport) = pending(mock);
        let start = Instant::now();

        let receipt = tx.wait().await.unwrap();
        assert_eq!(receipt.meta.tx_id, tx.id());
        assert_eq!(transport.receipt_calls(), 2);
        assert_eq!(start.elapsed(), BLOCK_INTERVAL);
    }
}
