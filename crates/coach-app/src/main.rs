use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coach_app::{AppConfig, ChatApp};
use coach_session::ChatSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting interview coach");
    tracing::info!(
        "Config loaded: model {}, reveal tick {}ms",
        config.llm.model,
        config.reveal.tick_ms
    );

    let session = ChatSession::builder()
        .config(config.session_config())
        .api_key(config.gemini_api_key.clone())
        .build()?;

    ChatApp::new(session, config.display).run().await
}

fn init_logging(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // stdout belongs to the chat
    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
