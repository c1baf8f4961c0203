use crate::error::FailureKind;
use crate::types::Message;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for single-shot text completion services (Gemini, test doubles)
///
/// Implementations report transport and protocol problems as `FailureKind`;
/// deciding what an empty or blocked answer means is left to the caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Non-streaming completion
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, FailureKind>;
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
        }
    }

    /// Text of the system message, if one was supplied
    pub fn system_instruction(&self) -> Option<&str> {
        self.messages.iter().find_map(|msg| match msg {
            Message::System { content } => Some(content.as_str()),
            Message::Human { .. } => None,
        })
    }
}

/// What the service sent back, before any interpretation
#[derive(Debug, Clone)]
pub struct Completion {
    /// Text of the first part of the first candidate
    pub text: Option<String>,
    pub candidate_count: usize,
    /// Safety feedback, only present when the prompt itself was judged
    pub prompt_feedback: Option<Value>,
}

impl Completion {
    /// Completion carrying a single candidate with the given text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            candidate_count: 1,
            prompt_feedback: None,
        }
    }

    /// Completion with no candidates, only safety feedback
    pub fn blocked(feedback: Value) -> Self {
        Self {
            text: None,
            candidate_count: 0,
            prompt_feedback: Some(feedback),
        }
    }

    /// Interpret the payload the way the chat flow does
    ///
    /// First candidate text wins and a first candidate without text is
    /// malformed. No candidates plus feedback means the prompt was blocked;
    /// no candidates and no feedback is an empty answer.
    pub fn into_text(self) -> Result<String, FailureKind> {
        if self.candidate_count > 0 {
            return self.text.ok_or_else(|| {
                FailureKind::Malformed("first candidate carries no text".to_string())
            });
        }
        if let Some(feedback) = &self.prompt_feedback {
            tracing::error!("Completion blocked, prompt feedback: {}", feedback);
            return Err(FailureKind::SafetyBlocked);
        }
        Err(FailureKind::EmptyResponse)
    }
}
