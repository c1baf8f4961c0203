use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::FailureKind;
use crate::traits::{CompletionClient, CompletionRequest};
use crate::types::Message;

/// Issues one stateless completion per call
///
/// Each call sends the system instruction plus the prompt as the only turn;
/// no history is ever forwarded to the service.
#[derive(Clone)]
pub struct CompletionRequester {
    client: Arc<dyn CompletionClient>,
    model: String,
    system_instruction: Option<String>,
}

impl CompletionRequester {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_instruction: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str) -> CompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(instruction) = &self.system_instruction {
            messages.push(Message::system(instruction.as_str()));
        }
        messages.push(Message::human(prompt));
        CompletionRequest::new(self.model.clone(), messages)
    }

    /// Send `prompt` and return the model text
    ///
    /// Cancelling `cancel` drops the transport future; a result that raced
    /// the cancellation is discarded in favour of `Cancelled`.
    pub async fn request(&self, prompt: &str, cancel: &CancellationToken) -> Result<String, FailureKind> {
        if cancel.is_cancelled() {
            return Err(FailureKind::Cancelled);
        }

        let request = self.build_request(prompt);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("REQUESTER: request aborted by cancellation");
                return Err(FailureKind::Cancelled);
            }
            outcome = self.client.complete(request) => outcome,
        };

        // Resolution and cancellation can land in the same tick
        if cancel.is_cancelled() {
            tracing::debug!("REQUESTER: discarding result that raced cancellation");
            return Err(FailureKind::Cancelled);
        }

        let text = outcome.and_then(|completion| completion.into_text());
        if let Err(kind) = &text {
            tracing::warn!("Completion failed: {}", kind);
        }
        text
    }
}
