//! Node access.
//!
//! # Data Flow
//! ```text
//! Builder / Poller / Thor facade
//!     → transport.rs (NodeTransport capability)
//!     → http.rs (REST over reqwest, timeouts, failover)
//!     → Thor node
//!
//! blocks.rs keeps the latest best block for a few seconds so repeated
//! builds do not refetch it.
//! ```
//!
//! # Design Decisions
//! - Everything above this module depends on the trait, never on HTTP
//! - `null` bodies mean "not found" and map to `Ok(None)`
//! - Only connection failures, timeouts and 5xx move to the next node

pub mod blocks;
pub mod http;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use blocks::Blocks;
pub use http::HttpClient;
pub use transport::NodeTransport;
pub use types::{
    Block, BlockRevision, Event, InspectRequest, InspectResponse, Output, ReceiptMeta,
    SendTransactionResponse, TransactionReceipt, Transfer,
};
