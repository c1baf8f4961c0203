use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const PENDING_SUMMARY_TEXT: &str = "Generating summary...";

/// Why a summary could not be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFailure {
    /// The service answered with a non-success status
    Rejected,
    /// The service answered but carried no candidate text
    Unavailable,
    /// Transport or decoding failure
    Failed,
}

impl SummaryFailure {
    pub fn display_text(&self) -> &'static str {
        match self {
            Self::Rejected => "Could not summarize.",
            Self::Unavailable => "Summary unavailable.",
            Self::Failed => "Summary failed.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SummaryEntry {
    Pending,
    Ready(String),
    Failed(SummaryFailure),
}

impl SummaryEntry {
    pub fn display_text(&self) -> &str {
        match self {
            Self::Pending => PENDING_SUMMARY_TEXT,
            Self::Ready(text) => text,
            Self::Failed(failure) => failure.display_text(),
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Summaries keyed by the literal text of a user turn
///
/// Two turns with identical text share one entry. Entries are never removed,
/// and a key that holds any value (failures included) is never refetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryIndex {
    entries: HashMap<String, SummaryEntry>,
}

impl SummaryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SummaryEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Claim `key` for fetching; false when it already holds a value
    pub fn mark_pending(&mut self, key: &str) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), SummaryEntry::Pending);
        true
    }

    /// Settle a pending key; settled entries are left as they are
    pub fn settle(&mut self, key: &str, entry: SummaryEntry) -> bool {
        match self.entries.get_mut(key) {
            Some(current) if !current.is_settled() => {
                *current = entry;
                true
            }
            None => {
                self.entries.insert(key.to_string(), entry);
                true
            }
            Some(_) => false,
        }
    }

    /// Text to show next to a user turn
    pub fn display_text(&self, key: &str) -> &str {
        self.get(key)
            .map(|entry| entry.display_text())
            .unwrap_or(PENDING_SUMMARY_TEXT)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.values().filter(|e| !e.is_settled()).count()
    }
}
