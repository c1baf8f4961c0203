use std::sync::Arc;

use coach_llm::{CompletionClient, CompletionRequest, FailureKind, Message};
use coach_types::{SummaryEntry, SummaryFailure, SummaryIndex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::templates;

/// Keeps a short summary for every distinct user question
///
/// Texts are fetched one at a time in log order. A text that already has an
/// entry (pending, ready or failed) is never requested again.
pub struct SummaryBatchFetcher {
    client: Option<Arc<dyn CompletionClient>>,
    model: String,
    index: SummaryIndex,
    published: watch::Sender<SummaryIndex>,
}

impl SummaryBatchFetcher {
    /// Without a client every reconcile is a no-op
    pub fn new(client: Option<Arc<dyn CompletionClient>>, model: impl Into<String>) -> Self {
        let (published, _) = watch::channel(SummaryIndex::new());
        Self {
            client,
            model: model.into(),
            index: SummaryIndex::new(),
            published,
        }
    }

    pub fn index(&self) -> &SummaryIndex {
        &self.index
    }

    /// Receiver that sees the index after every change
    pub fn subscribe(&self) -> watch::Receiver<SummaryIndex> {
        self.published.subscribe()
    }

    /// Fetch summaries for texts that have no entry yet
    ///
    /// Returns how many requests were made.
    pub async fn reconcile(&mut self, user_texts: &[String]) -> usize {
        let Some(client) = self.client.clone() else {
            return 0;
        };

        let mut fetched = 0;
        for text in user_texts {
            if !self.index.mark_pending(text) {
                continue;
            }
            self.publish();

            let entry = self.summarize(client.as_ref(), text).await;
            tracing::debug!("SUMMARY: {:?} -> {:?}", text, entry);
            self.index.settle(text, entry);
            self.publish();
            fetched += 1;
        }

        if fetched > 0 {
            tracing::info!("SUMMARY: fetched {} new summaries", fetched);
        }
        fetched
    }

    async fn summarize(&self, client: &dyn CompletionClient, text: &str) -> SummaryEntry {
        // No system instruction on summary requests
        let request = CompletionRequest::new(
            self.model.clone(),
            vec![Message::human(templates::summary_prompt(text))],
        );

        match client.complete(request).await {
            Ok(completion) => match completion.text {
                Some(summary) if !summary.trim().is_empty() => {
                    SummaryEntry::Ready(summary.trim().to_string())
                }
                _ => SummaryEntry::Failed(SummaryFailure::Unavailable),
            },
            Err(FailureKind::Http { status }) => {
                tracing::warn!("Summary request rejected with HTTP {}", status);
                SummaryEntry::Failed(SummaryFailure::Rejected)
            }
            Err(kind @ (FailureKind::SafetyBlocked | FailureKind::EmptyResponse)) => {
                tracing::warn!("Summary unavailable: {}", kind);
                SummaryEntry::Failed(SummaryFailure::Unavailable)
            }
            Err(kind) => {
                tracing::error!("Summary request failed: {}", kind);
                SummaryEntry::Failed(SummaryFailure::Failed)
            }
        }
    }

    fn publish(&self) {
        self.published.send_replace(self.index.clone());
    }

    /// Run in the background, reconciling on every log change
    ///
    /// `user_texts` is the watch published by the chat session. The task ends
    /// when the session is dropped.
    pub fn spawn(mut self, mut user_texts: watch::Receiver<Vec<String>>) -> SummaryWatcher {
        let index = self.subscribe();
        let task = tokio::spawn(async move {
            loop {
                let texts = user_texts.borrow_and_update().clone();
                self.reconcile(&texts).await;
                if user_texts.changed().await.is_err() {
                    tracing::debug!("SUMMARY: session closed, stopping");
                    break;
                }
            }
        });
        SummaryWatcher { index, task }
    }
}

/// Handle on the background summary task
#[derive(Debug)]
pub struct SummaryWatcher {
    index: watch::Receiver<SummaryIndex>,
    task: JoinHandle<()>,
}

impl SummaryWatcher {
    /// Latest published index
    pub fn snapshot(&self) -> SummaryIndex {
        self.index.borrow().clone()
    }

    /// True while any summary is still being fetched
    pub fn is_updating(&self) -> bool {
        self.index.borrow().pending_count() > 0
    }

    pub fn receiver(&self) -> watch::Receiver<SummaryIndex> {
        self.index.clone()
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Drop for SummaryWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
