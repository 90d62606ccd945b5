// In-memory screen state; nothing here outlives the process
pub mod bounded_log;
pub mod dashboard;
pub mod types;

pub use bounded_log::BoundedLog;
pub use dashboard::{Dashboard, LogEntry};
pub use types::{PriceSnapshot, Quote, PLACEHOLDER};
