use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings created.
pub const BOOKINGS_CREATED_TOTAL: &str = "innkeep_bookings_created_total";

/// Counter: bookings closed. Labels: outcome (cancelled | checked_out).
pub const BOOKINGS_CLOSED_TOTAL: &str = "innkeep_bookings_closed_total";

/// Counter: reservation attempts rejected by the conflict scan.
pub const BOOKING_CONFLICTS_TOTAL: &str = "innkeep_booking_conflicts_total";

/// Histogram: report computation latency in seconds. Labels: report.
pub const REPORT_DURATION_SECONDS: &str = "innkeep_report_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: rooms currently flagged occupied.
pub const ROOMS_OCCUPIED: &str = "innkeep_rooms_occupied";

/// Install the Prometheus metrics exporter on the given port. No-op if port
/// is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Install the default fmt subscriber. Embedding binaries call this once at
/// startup.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}
