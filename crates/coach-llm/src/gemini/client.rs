// Gemini-specific client implementation

use crate::error::FailureKind;
use crate::gemini::wire::{
    GenerateContentRequest, GenerateContentResponse, SystemInstruction, WireContent, WirePart,
};
use crate::traits::{Completion, CompletionClient, CompletionRequest};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini client (HTTP direct, no SDK)
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key_value = HeaderValue::from_str(&api_key).context("Invalid API key format")?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Point the client at another host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Build generateContent payload
    fn build_request(&self, messages: Vec<Message>) -> GenerateContentRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message {
                Message::System { content } => system_parts.push(WirePart::text(content)),
                Message::Human { content } => contents.push(WireContent {
                    role: Some("user".to_string()),
                    parts: vec![WirePart::text(content)],
                }),
            }
        }

        GenerateContentRequest {
            contents,
            system_instruction: if system_parts.is_empty() {
                None
            } else {
                Some(SystemInstruction { parts: system_parts })
            },
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, FailureKind> {
        let url = self.endpoint(&request.model);
        let payload = self.build_request(request.messages);

        tracing::debug!("GEMINI: POST {} ({} contents)", url, payload.contents.len());

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| FailureKind::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error ({}): {}", status, error_text);
            return Err(FailureKind::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FailureKind::Network(e.to_string()))?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        Ok(Completion {
            text: parsed.first_text(),
            candidate_count: parsed.candidates.len(),
            prompt_feedback: parsed.prompt_feedback,
        })
    }
}
