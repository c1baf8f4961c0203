/// Provider-agnostic message types
///
/// The completion service is stateless: every call carries an optional system
/// instruction and one user turn, nothing is remembered between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// System prompt (instructions)
    System { content: String },

    /// User/Human message
    Human { content: String },
}

impl Message {
    /// Create system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create human message
    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    /// Get role as the completion service names it
    pub fn role(&self) -> &str {
        match self {
            Self::System { .. } => "system",
            Self::Human { .. } => "user",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::System { content } | Self::Human { content } => content,
        }
    }
}
