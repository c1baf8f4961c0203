use std::sync::Arc;

use anyhow::{Context, Result};
use coach_llm::{ClientFactory, CompletionClient, ProviderConfig};
use coach_types::SessionConfig;

use crate::session::ChatSession;
use crate::templates::SYSTEM_INSTRUCTION;

/// Builder for a [`ChatSession`] with an optional completion client
///
/// The client is either given directly or created from an API key. Without
/// either, the session still works and answers every question with the
/// missing-credential notice.
pub struct SessionBuilder {
    config: SessionConfig,
    client: Option<Arc<dyn CompletionClient>>,
    api_key: Option<String>,
    system_instruction: String,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            client: None,
            api_key: None,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing client; takes precedence over `api_key`
    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Create a Gemini client from this key; blank keys count as missing
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn build(self) -> Result<ChatSession> {
        let client = match self.client {
            Some(client) => Some(client),
            None => match ProviderConfig::from_credential(self.api_key, self.config.base_url.clone()) {
                Some(provider) => Some(
                    ClientFactory::create_client(provider)
                        .context("Failed to create completion client")?,
                ),
                None => {
                    tracing::warn!("GEMINI_API_KEY is not set, live responses are disabled");
                    None
                }
            },
        };

        Ok(ChatSession::with_instruction(
            self.config,
            client,
            self.system_instruction,
        ))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_key() {
        let session = SessionBuilder::new().build().unwrap();
        assert!(!session.has_credential());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let session = SessionBuilder::new()
            .api_key(Some("   ".to_string()))
            .build()
            .unwrap();
        assert!(!session.has_credential());
    }

    #[test]
    fn test_build_with_key() {
        let session = SessionBuilder::new()
            .config(SessionConfig::new().with_base_url("http://127.0.0.1:9"))
            .api_key(Some("test-key".to_string()))
            .build()
            .unwrap();
        assert!(session.has_credential());
        assert_eq!(session.config().model, "gemini-2.0-flash");
    }
}
