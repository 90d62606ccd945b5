//! Live gold/silver quotes and a chat bot over one WebSocket feed.
//!
//! `Session` opens the feed once, keeps the latest prices and two bounded
//! logs, and sends user messages to the bot over HTTP.

pub mod config;
pub mod error;
pub mod feed;
pub mod notify;
pub mod session;
pub mod state;
pub mod telemetry;

pub use crate::config::AppConfig;
pub use crate::feed::{ConnectionState, FeedEvent, FeedSource, Frame, WsFeed};
pub use crate::notify::{HttpNotifier, Notifier, NotifyError};
pub use crate::session::{Session, SessionEvent, ASK_PROMPT};
pub use crate::state::{Dashboard, PriceSnapshot, Quote};
