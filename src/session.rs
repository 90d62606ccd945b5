// Session orchestrates feed + notifier + dashboard
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::feed::{ConnectionState, FeedEvent, FeedSource};
use crate::notify::{NotifyError, Notifier};
use crate::state::Dashboard;

/// Feed/notifier -> reducer channel buffer.
const EVENT_CHANNEL_BUFFER: usize = 1_024;

/// The canned question behind the "ask the bot" button.
pub const ASK_PROMPT: &str = "Fırsat mı?";

#[derive(Debug)]
pub enum SessionEvent {
    Feed(FeedEvent),
    Sent { message: String, result: Result<(), NotifyError> },
}

/// One screen's worth of live state.
///
/// Owns the feed connection and every in-flight bot request. Tearing it down,
/// either through [`Session::shutdown`] or by dropping it, closes the socket
/// and discards requests that have not finished yet. Only `shutdown` waits for
/// the final events to land.
pub struct Session {
    dashboard: Arc<Mutex<Dashboard>>,
    events: mpsc::Sender<SessionEvent>,
    notifier: Arc<dyn Notifier>,
    shutdown: CancellationToken,
    feed_task: JoinHandle<()>,
    reducer_task: JoinHandle<()>,
    // cancels `shutdown` when the session is dropped
    _teardown: DropGuard,
}

impl Session {
    /// Starts the feed and the reducer. Must be called inside a Tokio runtime.
    pub fn start<F>(feed: F, notifier: Arc<dyn Notifier>) -> Self
    where
        F: FeedSource + 'static,
    {
        let dashboard = Arc::new(Mutex::new(Dashboard::new()));
        let (tx, mut rx) = mpsc::channel::<SessionEvent>(EVENT_CHANNEL_BUFFER);
        let shutdown = CancellationToken::new();

        let reducer_dashboard = Arc::clone(&dashboard);
        let reducer_task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                reducer_dashboard.lock().apply(event);
            }
            debug!("session reducer drained");
        });

        let feed_tx = tx.clone();
        let feed_shutdown = shutdown.clone();
        let feed_task = tokio::spawn(async move {
            feed.run(feed_tx, feed_shutdown).await;
        });

        info!("session started");
        let _teardown = shutdown.clone().drop_guard();
        Self { dashboard, events: tx, notifier, shutdown, feed_task, reducer_task, _teardown }
    }

    /// Forwards `message` to the bot.
    ///
    /// Blank input is dropped without a request or a log line. The returned
    /// handle completes once the outcome is logged, or once the session is shut
    /// down, whichever comes first.
    pub fn send(&self, message: &str) -> Option<JoinHandle<()>> {
        if message.trim().is_empty() {
            return None;
        }

        let message = message.to_string();
        let outbound = message.clone();
        let notifier = Arc::clone(&self.notifier);
        let events = self.events.clone();
        let shutdown = self.shutdown.clone();

        Some(tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!(%message, "session closed before bot request finished");
                }
                result = notifier.notify(&outbound) => {
                    if events.send(SessionEvent::Sent { message, result }).await.is_err() {
                        warn!("bot request finished after the session reducer stopped");
                    }
                }
            }
        }))
    }

    pub fn ask(&self) -> Option<JoinHandle<()>> {
        self.send(ASK_PROMPT)
    }

    pub fn snapshot(&self) -> Dashboard {
        self.dashboard.lock().clone()
    }

    pub fn connection(&self) -> ConnectionState {
        self.dashboard.lock().connection()
    }

    /// Closes the socket, cancels pending requests and waits for the final
    /// events to land. Returns the last state of the dashboard.
    pub async fn shutdown(self) -> Dashboard {
        info!("session shutting down");
        self.shutdown.cancel();

        if let Err(e) = self.feed_task.await {
            warn!(error = %e, "feed task panicked");
        }

        drop(self.events);
        if let Err(e) = self.reducer_task.await {
            warn!(error = %e, "session reducer panicked");
        }

        let last = self.dashboard.lock().clone();
        last
    }
}
