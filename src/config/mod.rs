//! Endpoint configuration.
//!
//! Layers, lowest to highest priority: built-in defaults, an optional TOML
//! file, `ALSAT_*` environment variables (a `.env` file is honoured), and
//! finally whatever the caller overrides from the command line.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "alsat.toml";
pub const ENV_PREFIX: &str = "ALSAT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Price/bot feed, e.g. `wss://feed.example.com/ws`.
    pub ws_url: String,
    /// Bot HTTP base; messages go to `{api_base}/trigger_query`.
    pub api_base: String,
    pub log_filter: String,
    pub metrics_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://127.0.0.1:8000/ws".into(),
            api_base: "http://127.0.0.1:8000".into(),
            log_filter: "info".into(),
            metrics_port: 9000,
        }
    }
}

impl AppConfig {
    /// Loads defaults + `path` (or `alsat.toml` if present) + environment.
    ///
    /// Endpoints are not checked here; call [`AppConfig::validate`] once the
    /// command-line overrides are in.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        // dotenvy loads .env, but doesn't override already-set env vars
        dotenvy::dotenv().ok();

        let defaults = AppConfig::default();
        let mut builder = config::Config::builder()
            .set_default("ws_url", defaults.ws_url)?
            .set_default("api_base", defaults.api_base)?
            .set_default("log_filter", defaults.log_filter)?
            .set_default("metrics_port", i64::from(defaults.metrics_port))?;

        builder = match path {
            Some(p) => builder.add_source(config::File::from(p).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let cfg: AppConfig = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        Ok(cfg)
    }

    /// Applies command-line values on top of the loaded layers.
    pub fn with_overrides(mut self, ws_url: Option<String>, api_base: Option<String>, log_filter: Option<String>) -> Self {
        if let Some(url) = ws_url {
            self.ws_url = url;
        }
        if let Some(base) = api_base {
            self.api_base = base;
        }
        if let Some(filter) = log_filter {
            self.log_filter = filter;
        }
        self
    }

    /// Checks endpoint schemes. Run after every layer, overrides included.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_scheme("ws_url", &self.ws_url, &["ws://", "wss://"])?;
        check_scheme("api_base", &self.api_base, &["http://", "https://"])?;
        Ok(())
    }
}

fn check_scheme(field: &'static str, value: &str, schemes: &[&str]) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    let has_host = schemes
        .iter()
        .find_map(|s| trimmed.strip_prefix(s))
        .is_some_and(|rest| !rest.is_empty());
    if has_host {
        Ok(())
    } else {
        Err(ConfigError::InvalidEndpoint { field, value: value.to_string() })
    }
}
