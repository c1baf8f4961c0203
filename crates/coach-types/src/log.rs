use serde::{Deserialize, Serialize};

use crate::turn::{Role, Turn};

pub const DEFAULT_GREETING: &str =
    "Hello! I am your Interview Prep Coach. Ask me anything about Interview Prep!";

/// Topics shown on the dashboard; not derived from the conversation
pub const DASHBOARD_TOPICS: [&str; 4] = [
    "Resume Review",
    "System Design",
    "Behavioral Questions",
    "Algorithms",
];

/// Ordered, append-only record of the conversation
///
/// Insertion order is chronological order is display order. The log is
/// seeded with a greeting so it is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    /// Append a turn, returning its index
    pub fn append(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Never true for a seeded log
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn last_role(&self) -> Option<Role> {
        self.last().map(|turn| turn.role)
    }

    pub fn user_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|turn| turn.is_user())
    }

    /// Texts of user turns in log order, duplicates included
    pub fn user_texts(&self) -> Vec<String> {
        self.user_turns().map(|turn| turn.text.clone()).collect()
    }

    pub fn stats(&self) -> DashboardStats {
        let total_questions = self.user_turns().count();
        let assistant: Vec<&Turn> = self
            .turns
            .iter()
            .filter(|turn| turn.role == Role::Assistant)
            .collect();

        let avg_response_words = if assistant.is_empty() {
            0
        } else {
            let words: usize = assistant.iter().map(|turn| turn.word_count()).sum();
            (words as f64 / assistant.len() as f64).round() as usize
        };

        DashboardStats {
            total_questions,
            avg_response_words,
            topics: DASHBOARD_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

/// Figures shown on the dashboard view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_questions: usize,
    pub avg_response_words: usize,
    pub topics: Vec<String>,
}
