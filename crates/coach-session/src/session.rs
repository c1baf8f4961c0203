use std::fmt;
use std::sync::Arc;

use coach_llm::{
    CancellationToken, CompletionClient, CompletionRequester, FailureKind, CRITICAL_FAILURE_TEXT,
};
use coach_types::{ConversationLog, DashboardStats, Role, SessionConfig, SessionEvent, Turn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::builder::SessionBuilder;
use crate::document::{looks_like_pdf, DocumentContext, DocumentError, DocumentExtractor};
use crate::reveal::{RevealFrames, RevealHandle, TextRevealAnimator};
use crate::summary::{SummaryBatchFetcher, SummaryWatcher};
use crate::templates;

/// Identifies one submission for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    /// Waiting for the completion service
    Sending { request: RequestId },
    /// Reply appended and still being revealed; input stays locked
    Revealing { request: RequestId, index: usize },
}

impl SubmissionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// How a request task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Answer(String),
    Failed(FailureKind),
    /// The task panicked or was aborted
    Crashed(String),
}

impl ReplyOutcome {
    pub fn display_text(&self) -> String {
        match self {
            Self::Answer(text) => text.clone(),
            Self::Failed(kind) => kind.fallback_text(),
            Self::Crashed(_) => CRITICAL_FAILURE_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: RequestId,
    pub outcome: ReplyOutcome,
}

/// A request running in the background
///
/// Await [`PendingReply::wait`] and hand the result to
/// [`ChatSession::complete`]; the session decides whether it still counts.
#[derive(Debug)]
#[must_use = "the reply has to be passed back to the session"]
pub struct PendingReply {
    id: RequestId,
    task: JoinHandle<Result<String, FailureKind>>,
}

impl PendingReply {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub async fn wait(self) -> Reply {
        let outcome = match self.task.await {
            Ok(Ok(text)) => ReplyOutcome::Answer(text),
            Ok(Err(kind)) => ReplyOutcome::Failed(kind),
            Err(e) => {
                tracing::error!("Request task {} died: {}", self.id, e);
                ReplyOutcome::Crashed(e.to_string())
            }
        };
        Reply {
            id: self.id,
            outcome,
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank input, or a reply is still in progress
    Ignored,
    /// No credential; the error turn was appended right away
    Rejected,
    Sent(PendingReply),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    NothingToStop,
    /// The request was cancelled and the stop notice appended
    RequestCancelled,
    /// The reveal of the turn at `index` was cut short
    RevealSkipped { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Attached,
    /// Extraction failed; the previous document (if any) is kept
    Unreadable,
}

/// One chat conversation and everything in flight for it
///
/// At most one request or reveal is active at a time. Results are only
/// applied when they belong to the current submission, so a late answer to
/// a stopped request never reaches the log.
pub struct ChatSession {
    config: SessionConfig,
    log: ConversationLog,
    state: SubmissionState,
    client: Option<Arc<dyn CompletionClient>>,
    requester: Option<CompletionRequester>,
    in_flight: Option<CancellationToken>,
    document: Option<DocumentContext>,
    animator: TextRevealAnimator,
    reveal: Option<RevealHandle>,
    reveal_done_tx: mpsc::UnboundedSender<RequestId>,
    reveal_done_rx: mpsc::UnboundedReceiver<RequestId>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
    user_texts: watch::Sender<Vec<String>>,
}

impl ChatSession {
    /// Session with the default coaching instruction
    pub fn new(config: SessionConfig, client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self::with_instruction(config, client, templates::SYSTEM_INSTRUCTION)
    }

    pub(crate) fn with_instruction(
        config: SessionConfig,
        client: Option<Arc<dyn CompletionClient>>,
        system_instruction: impl Into<String>,
    ) -> Self {
        let requester = client.clone().map(|client| {
            CompletionRequester::new(client, config.model.clone())
                .with_system_instruction(system_instruction)
        });
        let log = ConversationLog::new(config.greeting.clone());
        let (reveal_done_tx, reveal_done_rx) = mpsc::unbounded_channel();
        let (user_texts, _) = watch::channel(log.user_texts());

        Self {
            animator: TextRevealAnimator::new(config.reveal_tick()),
            config,
            log,
            state: SubmissionState::Idle,
            client,
            requester,
            in_flight: None,
            document: None,
            reveal: None,
            reveal_done_tx,
            reveal_done_rx,
            events: None,
            user_texts,
        }
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Event stream for the view; a new subscription replaces the old one
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// User turn texts, republished after every user turn
    pub fn user_texts(&self) -> watch::Receiver<Vec<String>> {
        self.user_texts.subscribe()
    }

    pub fn summary_fetcher(&self) -> SummaryBatchFetcher {
        SummaryBatchFetcher::new(self.client.clone(), self.config.model.clone())
    }

    /// Start the background summary task for this session
    pub fn spawn_summaries(&self) -> SummaryWatcher {
        self.summary_fetcher().spawn(self.user_texts())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn turns(&self) -> &[Turn] {
        self.log.turns()
    }

    pub fn stats(&self) -> DashboardStats {
        self.log.stats()
    }

    pub fn has_credential(&self) -> bool {
        self.requester.is_some()
    }

    /// Last known state; call [`ChatSession::refresh`] to pick up finished reveals
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Apply reveal completions that arrived since the last call
    pub fn refresh(&mut self) {
        while let Ok(id) = self.reveal_done_rx.try_recv() {
            self.on_reveal_done(id);
        }
    }

    pub fn is_accepting_input(&mut self) -> bool {
        self.refresh();
        self.state.is_idle()
    }

    /// The "thinking" indicator: waiting on the service with the question last
    pub fn placeholder_visible(&self) -> bool {
        matches!(self.state, SubmissionState::Sending { .. })
            && self.log.last_role() == Some(Role::User)
    }

    pub fn document(&self) -> Option<&DocumentContext> {
        self.document.as_ref()
    }

    /// Submit a question
    ///
    /// Must be called inside a Tokio runtime; the request runs on its own task.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        self.refresh();

        let question = input.trim();
        if question.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if !self.state.is_idle() {
            tracing::debug!("SESSION: submission ignored while {:?}", self.state);
            return SubmitOutcome::Ignored;
        }

        self.append(Turn::user(question));

        let Some(requester) = self.requester.clone() else {
            tracing::warn!("No API key configured, skipping completion request");
            self.append(Turn::assistant(FailureKind::MissingCredential.fallback_text()));
            return SubmitOutcome::Rejected;
        };

        let id = RequestId::new();
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.state = SubmissionState::Sending { request: id };
        self.emit(SessionEvent::InputLocked);

        let prompt = self.compose_prompt(question);
        tracing::info!(
            "SESSION: request {} submitted (document: {})",
            id,
            self.document.is_some()
        );

        let task = tokio::spawn(async move { requester.request(&prompt, &cancel).await });
        SubmitOutcome::Sent(PendingReply { id, task })
    }

    /// Apply a finished request
    ///
    /// Returns false when the reply is stale (stopped or superseded) and was
    /// discarded. Otherwise the text is appended and starts revealing; input
    /// unlocks only once the reveal finishes.
    pub fn complete(&mut self, reply: Reply) -> bool {
        self.refresh();

        let SubmissionState::Sending { request } = self.state else {
            tracing::debug!("SESSION: discarding reply {} received while {:?}", reply.id, self.state);
            return false;
        };
        if request != reply.id {
            tracing::debug!("SESSION: discarding reply {} for superseded request", reply.id);
            return false;
        }
        let live = self.in_flight.as_ref().is_some_and(|token| !token.is_cancelled());
        if !live {
            tracing::debug!("SESSION: discarding reply {} after cancellation", reply.id);
            return false;
        }

        self.in_flight = None;
        let text = reply.outcome.display_text();
        let index = self.append(Turn::assistant(text.clone()));
        self.start_reveal(reply.id, index, text);
        true
    }

    /// Frames of the reply currently revealing; only the first call gets them
    pub fn take_reveal_frames(&mut self) -> Option<RevealFrames> {
        self.reveal.as_mut()?.take_frames()
    }

    /// Wait until the current reveal (if any) finishes or is stopped
    pub async fn reveal_settled(&mut self) {
        self.refresh();
        while matches!(self.state, SubmissionState::Revealing { .. }) {
            match self.reveal_done_rx.recv().await {
                Some(id) => self.on_reveal_done(id),
                None => break,
            }
        }
    }

    /// Stop whatever is in progress
    ///
    /// A pending request is cancelled and replaced by the stop notice. A
    /// running reveal is cut short and the full reply stays in the log; no
    /// turn is added for it.
    pub fn stop(&mut self) -> StopOutcome {
        self.refresh();

        match self.state {
            SubmissionState::Idle => StopOutcome::NothingToStop,
            SubmissionState::Sending { request } => {
                if let Some(token) = self.in_flight.take() {
                    token.cancel();
                }
                tracing::info!("SESSION: request {} stopped", request);
                self.state = SubmissionState::Idle;
                self.append(Turn::assistant(FailureKind::Cancelled.fallback_text()));
                self.emit(SessionEvent::InputUnlocked);
                StopOutcome::RequestCancelled
            }
            SubmissionState::Revealing { request, index } => {
                if let Some(handle) = self.reveal.take() {
                    handle.cancel();
                }
                tracing::debug!("SESSION: reveal of {} skipped", request);
                self.state = SubmissionState::Idle;
                self.emit(SessionEvent::RevealFinished { index });
                self.emit(SessionEvent::InputUnlocked);
                StopOutcome::RevealSkipped { index }
            }
        }
    }

    /// Attach a document whose text prefixes every following prompt
    ///
    /// Rejections (`Busy`, `NotPdf`) leave the log untouched. An extraction
    /// failure is reported in the conversation and keeps the previous
    /// document.
    pub async fn upload_document(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
        extractor: &dyn DocumentExtractor,
    ) -> Result<UploadOutcome, DocumentError> {
        self.refresh();
        if !self.state.is_idle() {
            return Err(DocumentError::Busy);
        }
        if !looks_like_pdf(&bytes) {
            tracing::warn!("Rejected upload {}: not a PDF", name);
            return Err(DocumentError::NotPdf);
        }

        tracing::info!("SESSION: extracting {} ({} bytes)", name, bytes.len());
        self.append(Turn::user(templates::processing_file_notice(name)));

        match extractor.extract(bytes).await {
            Ok(text) => {
                tracing::info!("SESSION: attached {} ({} chars)", name, text.len());
                self.document = Some(DocumentContext::new(name, text));
                self.emit(SessionEvent::DocumentAttached {
                    name: name.to_string(),
                });
                self.append(Turn::assistant(templates::document_ready_notice(name)));
                Ok(UploadOutcome::Attached)
            }
            Err(e) => {
                tracing::error!("Failed to extract text from {}: {}", name, e);
                self.append(Turn::assistant(templates::DOCUMENT_UNREADABLE_TEXT));
                Ok(UploadOutcome::Unreadable)
            }
        }
    }

    /// Dismiss the attached document; false if there was none
    pub fn clear_document(&mut self) -> bool {
        if self.document.take().is_none() {
            return false;
        }
        tracing::debug!("SESSION: document cleared");
        self.emit(SessionEvent::DocumentCleared);
        true
    }

    fn compose_prompt(&self, question: &str) -> String {
        match &self.document {
            Some(doc) if doc.has_text() => templates::document_prompt(&doc.text, question),
            _ => question.to_string(),
        }
    }

    fn append(&mut self, turn: Turn) -> usize {
        let role = turn.role;
        let index = self.log.append(turn);
        self.emit(SessionEvent::TurnAppended { index, role });
        self.emit(SessionEvent::ScrollToLatest);
        if role == Role::User {
            self.user_texts.send_replace(self.log.user_texts());
        }
        index
    }

    fn start_reveal(&mut self, id: RequestId, index: usize, text: String) {
        if let Some(previous) = self.reveal.take() {
            previous.cancel();
        }

        let done = self.reveal_done_tx.clone();
        let handle = self.animator.animate(text, move || {
            let _ = done.send(id);
        });

        self.reveal = Some(handle);
        self.state = SubmissionState::Revealing { request: id, index };
        self.emit(SessionEvent::RevealStarted { index });
    }

    fn on_reveal_done(&mut self, id: RequestId) {
        let SubmissionState::Revealing { request, index } = self.state else {
            return;
        };
        if request != id {
            return;
        }
        self.reveal = None;
        self.state = SubmissionState::Idle;
        tracing::debug!("SESSION: reveal of {} finished", id);
        self.emit(SessionEvent::RevealFinished { index });
        self.emit(SessionEvent::InputUnlocked);
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            // A closed view is not an error for the session
            let _ = tx.send(event);
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display_text() {
        assert_eq!(ReplyOutcome::Answer("hi".into()).display_text(), "hi");
        assert_eq!(
            ReplyOutcome::Failed(FailureKind::Http { status: 429 }).display_text(),
            "Error: The API call failed with status 429. Check the logs for details."
        );
        assert_eq!(
            ReplyOutcome::Crashed("panic".into()).display_text(),
            CRITICAL_FAILURE_TEXT
        );
    }

    #[test]
    fn test_session_without_client() {
        let session = ChatSession::new(SessionConfig::default(), None);
        assert!(!session.has_credential());
        assert_eq!(session.turns().len(), 1);
        assert!(session.state().is_idle());
        assert!(!session.placeholder_visible());
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut session = ChatSession::new(SessionConfig::default(), None);
        let mut events = session.subscribe();

        assert!(matches!(session.submit("   \n\t"), SubmitOutcome::Ignored));
        assert_eq!(session.turns().len(), 1);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_clear_without_document() {
        let mut session = ChatSession::new(SessionConfig::default(), None);
        assert!(!session.clear_document());
    }
}
