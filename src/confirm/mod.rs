//! Receipt polling.
//!
//! # Data Flow
//! ```text
//! PendingTx::wait / wait_for / wait_with
//!     → PollPolicy (how long, how often)
//!     → poll() (probe, sleep, repeat)
//!     → NodeTransport::receipt
//! ```
//!
//! # Design Decisions
//! - Both bounded policies are plain data consumed by one loop
//! - A receipt ends polling even when the transaction reverted
//! - "Not found yet" and transport errors are retried, never surfaced
//! - All timing goes through `tokio::time`, so a paused runtime clock
//!   drives the loop in tests

pub mod policy;
pub mod poller;

pub use policy::PollPolicy;
pub use poller::{poll, Exhausted, PendingTx};
