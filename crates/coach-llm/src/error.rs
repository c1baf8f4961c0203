use thiserror::Error;

/// Display text used when the request task itself dies (panic or abort)
pub const CRITICAL_FAILURE_TEXT: &str = "A critical error occurred. Check the logs for details.";

/// Every way a completion can fail to produce model text
///
/// None of these escape the session as a fault: each one has a fixed
/// display string that is appended to the conversation instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    #[error("network failure: {0}")]
    Network(String),

    #[error("completion service returned HTTP {status}")]
    Http { status: u16 },

    #[error("response blocked by safety settings")]
    SafetyBlocked,

    #[error("completion service returned no candidate text")]
    EmptyResponse,

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("no API key configured")]
    MissingCredential,
}

impl FailureKind {
    /// User-visible replacement for the assistant reply
    pub fn fallback_text(&self) -> String {
        match self {
            // An unreadable 200 body is reported like a dropped connection
            Self::Network(_) | Self::Malformed(_) => {
                "A network error occurred. Please check your connection and the logs.".to_string()
            }
            Self::Http { status } => format!(
                "Error: The API call failed with status {}. Check the logs for details.",
                status
            ),
            Self::SafetyBlocked => {
                "The response was blocked due to safety settings. Please check the logs.".to_string()
            }
            Self::EmptyResponse => "Sorry, I couldn't get a response. Please try again.".to_string(),
            Self::Cancelled => "Response generation stopped.".to_string(),
            Self::MissingCredential => "ERROR: API key is missing. Please create a .env file and add your API key to enable live responses.".to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for FailureKind {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Http {
                status: status.as_u16(),
            },
            None if err.is_decode() => Self::Malformed(err.to_string()),
            None => Self::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FailureKind {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fallback_mentions_status() {
        let text = FailureKind::Http { status: 503 }.fallback_text();
        assert!(text.contains("503"));
    }

    #[test]
    fn test_fallbacks_are_distinct() {
        let kinds = [
            FailureKind::Network("dns".into()),
            FailureKind::Http { status: 500 },
            FailureKind::SafetyBlocked,
            FailureKind::EmptyResponse,
            FailureKind::Cancelled,
            FailureKind::MissingCredential,
        ];
        let mut texts: Vec<String> = kinds.iter().map(|k| k.fallback_text()).collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), kinds.len());
    }

    #[test]
    fn test_malformed_reads_as_network_failure() {
        assert_eq!(
            FailureKind::Malformed("eof".into()).fallback_text(),
            FailureKind::Network("reset".into()).fallback_text()
        );
    }

    #[test]
    fn test_cancelled_text() {
        assert_eq!(FailureKind::Cancelled.fallback_text(), "Response generation stopped.");
        assert!(FailureKind::Cancelled.is_cancelled());
    }
}
