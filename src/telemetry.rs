use tracing_subscriber::EnvFilter;

// RUST_LOG wins over the configured default filter
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics() {
    use metrics_exporter_prometheus::PrometheusBuilder;

    match PrometheusBuilder::new().with_http_listener(([0, 0, 0, 0], 9000)).install() {
        Ok(()) => {
            tracing::info!("Prometheus exporter listening on http://0.0.0.0:9000/metrics");
            metrics::gauge!("bazaar_up").set(1.0);
        }
        Err(e) => tracing::warn!(error = %e, "Prometheus exporter install failed"),
    }
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics() { /* no-op */ }
