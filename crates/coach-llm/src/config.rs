// Configuration layer for provider-agnostic completion client creation
// This module provides a factory pattern for creating completion clients from configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::traits::CompletionClient;

/// Type of completion provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Gemini,
}

/// Configuration for the Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Base URL for the API (optional, defaults to https://generativelanguage.googleapis.com/v1beta)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Provider-specific configuration details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderDetails {
    Gemini(GeminiConfig),
}

/// Complete provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(flatten)]
    pub details: ProviderDetails,
}

impl ProviderConfig {
    /// Create Gemini provider config
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self {
            details: ProviderDetails::Gemini(GeminiConfig::new(api_key)),
        }
    }

    /// Build from an optional credential
    ///
    /// Blank keys count as missing; the caller decides what to do without one.
    pub fn from_credential(api_key: Option<String>, base_url: Option<String>) -> Option<Self> {
        let api_key = api_key.filter(|key| !key.trim().is_empty())?;
        let mut gemini = GeminiConfig::new(api_key);
        gemini.base_url = base_url;
        Some(Self {
            details: ProviderDetails::Gemini(gemini),
        })
    }

    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        match self.details {
            ProviderDetails::Gemini(_) => ProviderType::Gemini,
        }
    }
}

/// Factory for creating completion clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a completion client from provider configuration
    pub fn create_client(config: ProviderConfig) -> Result<Arc<dyn CompletionClient>> {
        match config.details {
            ProviderDetails::Gemini(gemini_config) => {
                let mut client = crate::gemini::GeminiClient::new(gemini_config.api_key)?;
                if let Some(base_url) = gemini_config.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_config() {
        let config = ProviderConfig::gemini("test-key");
        assert_eq!(config.provider_type(), ProviderType::Gemini);
    }

    #[test]
    fn test_blank_credential_is_missing() {
        assert!(ProviderConfig::from_credential(None, None).is_none());
        assert!(ProviderConfig::from_credential(Some("   ".to_string()), None).is_none());
        assert!(ProviderConfig::from_credential(Some("key".to_string()), None).is_some());
    }

    #[test]
    fn test_serde_tagged() {
        let config = ProviderConfig::gemini("test-key");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "gemini");
        assert_eq!(json["api_key"], "test-key");

        let back: ProviderConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.provider_type(), ProviderType::Gemini);
    }

    #[test]
    fn test_factory_builds_client() {
        let config = ProviderConfig::from_credential(
            Some("key".to_string()),
            Some("http://localhost:9".to_string()),
        )
        .unwrap();
        assert!(ClientFactory::create_client(config).is_ok());
    }
}
