use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: rooms created.
pub const ROOMS_CREATED_TOTAL: &str = "slotwise_rooms_created_total";

/// Counter: bookings confirmed.
pub const BOOKINGS_CREATED_TOTAL: &str = "slotwise_bookings_created_total";

/// Counter: create requests rejected by the conflict detector.
pub const BOOKING_CONFLICTS_TOTAL: &str = "slotwise_booking_conflicts_total";

/// Counter: bookings cancelled.
pub const BOOKINGS_CANCELLED_TOTAL: &str = "slotwise_bookings_cancelled_total";

/// Counter: create requests rejected by the validator.
pub const VALIDATION_FAILURES_TOTAL: &str = "slotwise_validation_failures_total";

/// Counter: responses replayed from the idempotency cache.
pub const IDEMPOTENT_REPLAYS_TOTAL: &str = "slotwise_idempotent_replays_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Counter: completed idempotency records purged by the reaper.
pub const IDEMPOTENCY_RECORDS_PURGED_TOTAL: &str =
    "slotwise_idempotency_records_purged_total";

/// Histogram: utilization report computation in seconds.
pub const REPORT_DURATION_SECONDS: &str = "slotwise_report_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Install the fmt tracing subscriber. Call once from the host process.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}
