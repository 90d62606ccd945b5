use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config load failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid {field}: {value:?}")]
    InvalidEndpoint { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("metrics exporter: {0}")]
    Metrics(String),
}
