//! Prometheus metrics for the Kovra ledger service.
//!
//! Registered once at process start and scraped through the axum
//! `/metrics` route in `routes.rs` rather than a dedicated listener.

#![allow(dead_code)]

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Encoder, Gauge,
    HistogramVec, TextEncoder,
};

lazy_static! {
    pub static ref TRANSFERS_SUBMITTED: CounterVec = register_counter_vec!(
        "kovra_transfers_submitted_total",
        "Total number of transfers submitted to the accounting engine",
        &["kind", "status"]
    )
    .unwrap();

    pub static ref ENGINE_CALL_LATENCY: HistogramVec = register_histogram_vec!(
        "kovra_engine_call_latency_seconds",
        "Latency of calls to the accounting engine",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .unwrap();

    pub static ref ENGINE_ERRORS: CounterVec = register_counter_vec!(
        "kovra_engine_errors_total",
        "Total number of accounting engine errors",
        &["operation", "kind"]
    )
    .unwrap();

    pub static ref WALLETS_PROVISIONED: CounterVec = register_counter_vec!(
        "kovra_wallets_provisioned_total",
        "Total number of wallets provisioned",
        &["currency"]
    )
    .unwrap();

    pub static ref IDEMPOTENCY_HITS: Gauge = register_gauge!(
        "kovra_idempotency_cache_hits_total",
        "Total number of idempotency-key cache hits"
    )
    .unwrap();

    pub static ref UP: Gauge =
        register_gauge!("kovra_up", "Whether the service is up and running").unwrap();
}

/// Render the current metric registry in Prometheus text exposition format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).ok();
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_transfer_submitted(kind: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    TRANSFERS_SUBMITTED.with_label_values(&[kind, status]).inc();
}

pub fn record_engine_latency(operation: &str, seconds: f64) {
    ENGINE_CALL_LATENCY.with_label_values(&[operation]).observe(seconds);
}

pub fn record_engine_error(operation: &str, kind: &str) {
    ENGINE_ERRORS.with_label_values(&[operation, kind]).inc();
}

pub fn record_wallet_provisioned(currency: &str) {
    WALLETS_PROVISIONED.with_label_values(&[currency]).inc();
}

pub fn record_idempotency_hit() {
    IDEMPOTENCY_HITS.inc();
}
