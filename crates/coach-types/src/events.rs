use serde::{Deserialize, Serialize};

use crate::turn::Role;

/// Notifications the chat session publishes for its view
///
/// Every `TurnAppended` is followed by exactly one `ScrollToLatest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A turn was added at `index`
    TurnAppended {
        index: usize,
        role: Role,
    },

    /// The view should show the newest content
    ScrollToLatest,

    /// Submission disabled (request or reveal in progress)
    InputLocked,

    /// Submission accepted again
    InputUnlocked,

    /// The turn at `index` started revealing
    RevealStarted {
        index: usize,
    },

    /// The turn at `index` is fully shown, either by finishing or by a stop
    RevealFinished {
        index: usize,
    },

    /// A document was extracted and will prefix the next prompts
    DocumentAttached {
        name: String,
    },

    /// The document context was dismissed
    DocumentCleared,
}
