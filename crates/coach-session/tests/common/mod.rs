#![allow(dead_code)]

use async_trait::async_trait;
use coach_llm::{Completion, CompletionClient, CompletionRequest, FailureKind};
use coach_session::{DocumentError, DocumentExtractor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<Completion, FailureKind> + Send + Sync>;

/// In-memory completion service: counts calls, records requests, answers
/// through a closure after an optional delay
pub struct ScriptedClient {
    responder: Responder,
    delay: Duration,
    calls: AtomicUsize,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<Completion, FailureKind> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(Completion::from_text(text.clone())))
    }

    pub fn failing(kind: FailureKind) -> Self {
        Self::new(move |_| Err(kind.clone()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Text of the single user message of request `n`
    pub fn prompt(&self, n: usize) -> String {
        let seen = self.seen.lock().unwrap();
        seen[n].messages.last().unwrap().content().to_string()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, FailureKind> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = (self.responder)(&request);
        self.seen.lock().unwrap().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        reply
    }
}

/// Extractor that returns fixed text or fails
pub struct FakeExtractor {
    text: Option<String>,
}

impl FakeExtractor {
    pub fn reading(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }

    pub fn broken() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl DocumentExtractor for FakeExtractor {
    async fn extract(&self, _bytes: Vec<u8>) -> Result<String, DocumentError> {
        self.text
            .clone()
            .ok_or_else(|| DocumentError::Extraction("corrupt xref table".to_string()))
    }
}

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n%fake\n";
