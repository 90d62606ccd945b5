// Price/bot feed entrypoint
pub mod connection; // WebSocket listener + explicit connection state
pub mod frame;      // JSON frame -> Frame

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::session::SessionEvent;
pub use connection::{ConnectionState, WsFeed};
pub use frame::{decode, Frame, FrameError};

/// Everything the listener can observe about its one connection.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Connecting,
    Opened,
    Frame(Frame),
    // parse failure; the reason only goes to tracing
    Malformed(String),
    TransportError(String),
    // the endpoint could not even be dialled (bad URL)
    ConnectFailed(String),
    Closed,
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Runs a single connection to completion. Never reconnects.
    async fn run(&self, events: mpsc::Sender<SessionEvent>, shutdown: CancellationToken);
}
