//! Client-side transaction engine for Thor networks.
//!
//! # Architecture Overview
//!
//! ```text
//!   clauses ──▶ builder ──(gas)──────▶ gas::simulate ──▶ client (dry run)
//!                  │    ──(block ref)─▶ client::Blocks (cached best block)
//!                  ▼
//!            transaction (RLP body, signing hashes)
//!                  │
//!                  ▼
//!              signer (origin, optional gas payer)
//!                  │
//!                  ▼
//!            Thor::send ──▶ client (submit) ──▶ confirm::PendingTx (poll receipt)
//! ```
//!
//! Cross-cutting: `config` (TOML), `observability` (tracing, metrics),
//! `error` (one error type for every operation).

pub mod builder;
pub mod client;
pub mod config;
pub mod confirm;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod gas;
pub mod observability;
pub mod signer;
pub mod thor;
pub mod transaction;

pub use builder::{ChainContext, Transactor, TxOptions};
pub use client::{HttpClient, NodeTransport};
pub use config::ThorConfig;
pub use confirm::{PendingTx, PollPolicy};
pub use error::{ThorError, ThorResult};
pub use signer::{LocalSigner, RemoteDelegator, TxSigner};
pub use thor::Thor;
pub use transaction::{BlockRef, Clause, Features, Transaction};
