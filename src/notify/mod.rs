//! Outbound messages to the chat bot.
//!
//! A message is a single fire-and-forget `POST {api_base}/trigger_query`.
//! The bot answers later on the feed as a `bot_reply` frame; nothing here
//! correlates the two.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("bot endpoint answered HTTP {status}")]
    Rejected { status: u16 },

    #[error("{0}")]
    Network(#[from] reqwest::Error),
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct TriggerQuery<'a> {
    message: &'a str,
}

pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String, // "{api_base}/trigger_query"
}

impl HttpNotifier {
    pub fn new(api_base: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_base)
    }

    pub fn with_client(client: reqwest::Client, api_base: &str) -> Self {
        let endpoint = format!("{}/trigger_query", api_base.trim_end_matches('/'));
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Notifier for HttpNotifier {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        // .json() sets Content-Type: application/json
        let res = self
            .client
            .post(&self.endpoint)
            .json(&TriggerQuery { message })
            .send()
            .await
            .map_err(|e| {
                metrics::counter!("alsat_notify_total", "outcome" => "network").increment(1);
                warn!(error = %e, "bot request failed");
                NotifyError::from(e)
            })?;

        let status = res.status();
        if status.is_success() {
            metrics::counter!("alsat_notify_total", "outcome" => "delivered").increment(1);
            debug!(%status, "bot message delivered");
            Ok(())
        } else {
            metrics::counter!("alsat_notify_total", "outcome" => "rejected").increment(1);
            warn!(%status, "bot endpoint rejected message");
            Err(NotifyError::Rejected { status: status.as_u16() })
        }
    }
}
