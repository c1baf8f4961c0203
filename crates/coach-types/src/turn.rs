use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation
///
/// The stored text never changes after creation; progressive display of the
/// newest assistant turn is derived from it, not written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Local wall-clock time the turn was added, `HH:MM`
    pub fn clock_time(&self) -> String {
        self.created_at.with_timezone(&Local).format("%H:%M").to_string()
    }

    /// Number of single-space separated pieces
    pub fn word_count(&self) -> usize {
        self.text.split(' ').count()
    }
}
