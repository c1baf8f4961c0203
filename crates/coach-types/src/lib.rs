pub mod config;
pub mod events;
pub mod log;
pub mod summary;
pub mod turn;

pub use config::{DisplaySettings, FontSize, SessionConfig, Theme, DEFAULT_MODEL};
pub use events::SessionEvent;
pub use log::{ConversationLog, DashboardStats, DASHBOARD_TOPICS, DEFAULT_GREETING};
pub use summary::{SummaryEntry, SummaryFailure, SummaryIndex, PENDING_SUMMARY_TEXT};
pub use turn::{Role, Turn};
