//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: tx_id, attempt, node_idx)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits; the binary decides where output goes
//! - Metric updates without an installed recorder are no-ops

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
