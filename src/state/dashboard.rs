//! The screen's state: latest prices, bot replies and the activity log.
//!
//! `Dashboard::apply` is the only way in. The session's reducer task is its
//! single writer; everyone else reads clones.

use std::fmt;

use chrono::{Local, NaiveTime};
use tracing::{debug, trace};

use crate::feed::{ConnectionState, FeedEvent, Frame};
use crate::notify::NotifyError;
use crate::session::SessionEvent;
use crate::state::bounded_log::BoundedLog;
use crate::state::types::PriceSnapshot;

pub const ACTIVITY_LOG_CAP: usize = 80;
pub const BOT_REPLY_CAP: usize = 50;

// Activity lines as shown to the user
pub const MSG_OPENED: &str = "WebSocket bağlı";
pub const MSG_TRANSPORT_ERROR: &str = "WebSocket hata";
pub const MSG_CLOSED: &str = "WebSocket kapandı";
pub const MSG_CONNECT_FAILED: &str = "WS bağlantı hatası";
pub const MSG_PARSE_ERROR: &str = "WS parse error";
pub const MSG_SEND_REJECTED: &str = "BOT gönderim hatası";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: NaiveTime,
    pub text: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.at.format("%H:%M:%S"), self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    prices: PriceSnapshot,
    activity: BoundedLog<LogEntry>,
    replies: BoundedLog<String>,
    connection: ConnectionState,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            prices: PriceSnapshot::default(),
            activity: BoundedLog::with_capacity(ACTIVITY_LOG_CAP),
            replies: BoundedLog::with_capacity(BOT_REPLY_CAP),
            connection: ConnectionState::Idle,
        }
    }

    pub fn prices(&self) -> &PriceSnapshot {
        &self.prices
    }

    pub fn activity(&self) -> &BoundedLog<LogEntry> {
        &self.activity
    }

    pub fn replies(&self) -> &BoundedLog<String> {
        &self.replies
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Feed(ev) => self.apply_feed(ev),
            SessionEvent::Sent { message, result } => self.apply_sent(&message, &result),
        }
    }

    pub fn apply_feed(&mut self, event: FeedEvent) {
        self.connection = self.connection.advance(&event);
        trace!(?event, state = ?self.connection, "feed event");

        match event {
            FeedEvent::Connecting => {}
            FeedEvent::Opened => self.push_log(MSG_OPENED),
            FeedEvent::TransportError(_) => self.push_log(MSG_TRANSPORT_ERROR),
            FeedEvent::Closed => self.push_log(MSG_CLOSED),
            FeedEvent::ConnectFailed(_) => self.push_log(MSG_CONNECT_FAILED),
            FeedEvent::Malformed(_) => self.push_log(MSG_PARSE_ERROR),
            FeedEvent::Frame(Frame::Price(snapshot)) => {
                debug!(gram = %snapshot.gram, gumus = %snapshot.gumus, "prices updated");
                self.prices = snapshot;
            }
            FeedEvent::Frame(Frame::BotReply(reply)) => {
                self.push_log(format!("🤖 BOT: {reply}"));
                self.replies.push(reply);
            }
            FeedEvent::Frame(Frame::Ignored) => {}
        }
    }

    pub fn apply_sent(&mut self, message: &str, result: &Result<(), NotifyError>) {
        match result {
            Ok(()) => self.push_log(format!("BOT mesajı gönderildi: {message}")),
            Err(NotifyError::Rejected { .. }) => self.push_log(MSG_SEND_REJECTED),
            Err(NotifyError::Network(e)) => self.push_log(format!("Network error: {e}")),
        }
    }

    fn push_log(&mut self, text: impl Into<String>) {
        self.push_log_at(Local::now().time(), text);
    }

    fn push_log_at(&mut self, at: NaiveTime, text: impl Into<String>) {
        self.activity.push(LogEntry { at, text: text.into() });
    }
}
