//! Metrics collection and exposition.
//!
//! # Metrics
//! - `thor_simulations_total` (counter): dry runs by outcome
//! - `thor_submissions_total` (counter): submitted transactions by outcome
//! - `thor_confirmations_total` (counter): receipt waits by outcome
//! - `thor_confirmation_attempts` (histogram): receipt lookups per wait
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade
//! - The Prometheus exporter is only installed by the binary, on request

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Record a finished or failed dry run.
pub fn record_simulation(success: bool) {
    metrics::counter!("thor_simulations_total", "outcome" => outcome(success)).increment(1);
}

/// Record a transaction submission.
pub fn record_submission(success: bool) {
    metrics::counter!("thor_submissions_total", "outcome" => outcome(success)).increment(1);
}

/// Record the end of a receipt wait.
pub fn record_confirmation(confirmed: bool, attempts: u32) {
    let result = if confirmed { "confirmed" } else { "timeout" };
    metrics::counter!("thor_confirmations_total", "outcome" => result).increment(1);
    metrics::histogram!("thor_confirmation_attempts").record(attempts as f64);
}

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}
