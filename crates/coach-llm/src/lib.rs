pub mod types;
pub mod traits;
pub mod error;
pub mod config;
pub mod gemini;
pub mod requester;

pub use traits::{CompletionClient, CompletionRequest, Completion};

pub use error::{FailureKind, CRITICAL_FAILURE_TEXT};
pub use config::{ClientFactory, GeminiConfig, ProviderConfig, ProviderType};
pub use gemini::GeminiClient;
pub use requester::CompletionRequester;
pub use types::Message;

pub use tokio_util::sync::CancellationToken;
