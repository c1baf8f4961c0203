use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::log::DEFAULT_GREETING;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub model: String,
    /// Delay between two revealed tokens
    pub reveal_tick_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub greeting: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            reveal_tick_ms: 50,
            base_url: None,
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_reveal_tick(mut self, tick: Duration) -> Self {
        self.reveal_tick_ms = tick.as_millis() as u64;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn reveal_tick(&self) -> Duration {
        // A zero period would make the reveal timer panic
        Duration::from_millis(self.reveal_tick_ms.max(1))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Sm,
    #[default]
    Base,
    Lg,
}

impl FontSize {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sm => "Small",
            Self::Base => "Medium",
            Self::Lg => "Large",
        }
    }
}

/// Presentation preferences; no effect on the chat flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_size: FontSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.reveal_tick(), Duration::from_millis(50));
    }

    #[test]
    fn test_zero_tick_is_clamped() {
        let config = SessionConfig::new().with_reveal_tick(Duration::ZERO);
        assert_eq!(config.reveal_tick(), Duration::from_millis(1));
    }

    #[test]
    fn test_display_settings_deserialize() {
        let settings: DisplaySettings =
            serde_json::from_str(r#"{"theme":"light","font_size":"lg"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.font_size.label(), "Large");
    }
}
