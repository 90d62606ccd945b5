use tracing_subscriber::EnvFilter;

use crate::error::TelemetryError;

/// RUST_LOG wins over `default_filter`. Logs go to stderr so they never
/// interleave with the prompt.
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
pub fn init_metrics(port: u16) -> Result<(), TelemetryError> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;

    tracing::info!(port, "prometheus exporter listening on /metrics");
    metrics::gauge!("alsat_up").set(1.0);
    Ok(())
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics(_port: u16) -> Result<(), TelemetryError> { Ok(()) }
