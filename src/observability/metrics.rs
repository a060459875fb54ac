//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_batches_total` (counter): relayed batches by outcome
//! - `relay_transactions_sent_total` (counter): broadcast transactions by payload kind
//! - `relay_payloads_skipped_total` (counter): malformed payloads dropped
//! - `relay_batch_duration_seconds` (histogram): end-to-end batch latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

pub const BATCHES_TOTAL: &str = "relay_batches_total";
pub const TRANSACTIONS_SENT_TOTAL: &str = "relay_transactions_sent_total";
pub const PAYLOADS_SKIPPED_TOTAL: &str = "relay_payloads_skipped_total";
pub const BATCH_DURATION_SECONDS: &str = "relay_batch_duration_seconds";

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(BATCHES_TOTAL, "Relayed bridge operation batches by outcome");
    describe_counter!(
        TRANSACTIONS_SENT_TOTAL,
        "Transactions broadcast to the chain by payload kind"
    );
    describe_counter!(PAYLOADS_SKIPPED_TOTAL, "Malformed payloads skipped");
    describe_histogram!(BATCH_DURATION_SECONDS, "Batch relay latency in seconds");

    tracing::info!(address = %addr, "Serving metrics");
    Ok(())
}

/// Record a finished batch. `outcome` is `success`, `cancelled` or `error`.
pub fn record_batch(outcome: &'static str, started: Instant) {
    counter!(BATCHES_TOTAL, "outcome" => outcome).increment(1);
    histogram!(BATCH_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
}

pub fn record_transaction_sent(kind: &'static str) {
    counter!(TRANSACTIONS_SENT_TOTAL, "kind" => kind).increment(1);
}

pub fn record_payload_skipped() {
    counter!(PAYLOADS_SKIPPED_TOTAL).increment(1);
}
