//! One-shot WebSocket listener.
//!
//! Opens exactly one connection, forwards decoded frames, and reports the
//! end of the connection. There is no reconnect: once `Closed`, the feed stays
//! closed until a new session is started.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::frame::{self, Frame, FrameError};
use super::{FeedEvent, FeedSource};
use crate::session::SessionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    /// Next state after `event`. `Closed` is terminal.
    pub fn advance(self, event: &FeedEvent) -> Self {
        use ConnectionState::*;
        match (self, event) {
            (Closed, _) => Closed,
            (_, FeedEvent::Connecting) => Connecting,
            (_, FeedEvent::Opened) => Open,
            (_, FeedEvent::Closed) | (_, FeedEvent::ConnectFailed(_)) => Closed,
            (state, _) => state,
        }
    }

    pub fn is_closed(self) -> bool {
        self == ConnectionState::Closed
    }
}

pub struct WsFeed {
    pub url: String, // e.g. "wss://feed.example.com/ws"
}

impl WsFeed {
    pub fn new(url: &str) -> Self {
        Self { url: url.to_string() }
    }

    fn decode_message(msg: &Message) -> Option<Result<Frame, FrameError>> {
        match msg {
            Message::Text(text) => Some(frame::decode(text)),
            Message::Binary(bytes) => Some(frame::decode_bytes(bytes)),
            // ping/pong are answered by tungstenite; raw frames never surface on read
            _ => None,
        }
    }
}

// Send an event to the session; a dropped receiver means the session is gone
async fn emit(events: &mpsc::Sender<SessionEvent>, event: FeedEvent) -> bool {
    events.send(SessionEvent::Feed(event)).await.is_ok()
}

#[async_trait::async_trait]
impl FeedSource for WsFeed {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn run(&self, events: mpsc::Sender<SessionEvent>, shutdown: CancellationToken) {
        emit(&events, FeedEvent::Connecting).await;

        let connected = tokio::select! {
            res = tokio_tungstenite::connect_async(self.url.as_str()) => res,
            _ = shutdown.cancelled() => {
                debug!("shutdown before the feed connected");
                emit(&events, FeedEvent::Closed).await;
                return;
            }
        };

        let ws_stream = match connected {
            Ok((ws_stream, response)) => {
                info!(status = %response.status(), "feed connected");
                ws_stream
            }
            Err(e @ (tungstenite::Error::Url(_) | tungstenite::Error::HttpFormat(_))) => {
                warn!(error = %e, "feed URL rejected");
                emit(&events, FeedEvent::ConnectFailed(e.to_string())).await;
                return;
            }
            Err(e) => {
                warn!(error = %e, "failed to connect to feed");
                emit(&events, FeedEvent::TransportError(e.to_string())).await;
                emit(&events, FeedEvent::Closed).await;
                return;
            }
        };

        if !emit(&events, FeedEvent::Opened).await {
            return;
        }

        let (mut write, mut read) = ws_stream.split();
        let mut frames: u64 = 0;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!(frames, "closing feed on shutdown");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!(error = %e, "close frame not delivered");
                    }
                    emit(&events, FeedEvent::Closed).await;
                    break;
                }
                msg = read.next() => match msg {
                    Some(Ok(Message::Close(reason))) => {
                        info!(?reason, frames, "feed closed by server");
                        emit(&events, FeedEvent::Closed).await;
                        break;
                    }
                    Some(Ok(msg)) => {
                        let Some(decoded) = Self::decode_message(&msg) else { continue };
                        frames += 1;
                        let event = match decoded {
                            Ok(frame) => {
                                metrics::counter!("alsat_frames_total", "kind" => frame_kind(&frame)).increment(1);
                                FeedEvent::Frame(frame)
                            }
                            Err(e) => {
                                metrics::counter!("alsat_parse_errors_total").increment(1);
                                debug!(error = %e, "unparseable frame");
                                FeedEvent::Malformed(e.to_string())
                            }
                        };
                        if !emit(&events, event).await {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, frames, "feed read error");
                        emit(&events, FeedEvent::TransportError(e.to_string())).await;
                        emit(&events, FeedEvent::Closed).await;
                        break;
                    }
                    None => {
                        info!(frames, "feed stream ended");
                        emit(&events, FeedEvent::Closed).await;
                        break;
                    }
                }
            }
        }
    }
}

fn frame_kind(frame: &Frame) -> &'static str {
    match frame {
        Frame::Price(_) => "price",
        Frame::BotReply(_) => "bot_reply",
        Frame::Ignored => "ignored",
    }
}
