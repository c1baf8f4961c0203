use config::{Config as ConfigLoader, ConfigError, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use coach_types::{DisplaySettings, SessionConfig, DEFAULT_MODEL};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplaySettings,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub gemini_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    /// Override for the generateContent endpoint base, used against mocks
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevealConfig {
    pub tick_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self { tick_ms: 50 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Environment variables and the config keys they override
const ENV_OVERRIDES: [(&str, &str); 7] = [
    ("LLM_MODEL", "llm.model"),
    ("LLM_BASE_URL", "llm.base_url"),
    ("REVEAL_TICK_MS", "reveal.tick_ms"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
    ("DISPLAY_THEME", "display.theme"),
    ("DISPLAY_FONT_SIZE", "display.font_size"),
];

impl AppConfig {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (`LLM_MODEL`, `REVEAL_TICK_MS`, `LOG_LEVEL`, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        // 3. Environment variables override everything
        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }

        let mut cfg: AppConfig = builder.build()?.try_deserialize()?;

        // Missing key is not fatal: the session runs without live responses
        cfg.gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        builder.build()?.try_deserialize()
    }

    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::new()
            .with_model(self.llm.model.clone())
            .with_reveal_tick(Duration::from_millis(self.reveal.tick_ms));
        match &self.llm.base_url {
            Some(base_url) => config.with_base_url(base_url.clone()),
            None => config,
        }
    }
}
