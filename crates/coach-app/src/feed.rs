use coach_types::{Role, SessionEvent, Turn};
use tokio::sync::mpsc;

use crate::view;

/// Turns session events into terminal lines
///
/// Drained after every session call. An appended turn whose reveal starts in
/// the same batch is skipped, because the reveal prints it frame by frame.
pub struct EventFeed {
    events: mpsc::UnboundedReceiver<SessionEvent>,
    /// Index of the user turn the terminal already echoed
    echoed: Option<usize>,
}

impl EventFeed {
    pub fn new(events: mpsc::UnboundedReceiver<SessionEvent>) -> Self {
        Self {
            events,
            echoed: None,
        }
    }

    /// The next turn at `index` was typed at the prompt; don't print it again
    ///
    /// Only holds until the next `drain`.
    pub fn mark_echoed(&mut self, index: usize) {
        self.echoed = Some(index);
    }

    pub fn drain(&mut self, turns: &[Turn]) -> Vec<String> {
        let mut batch = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            batch.push(event);
        }
        let echoed = self.echoed.take();

        let revealing: Vec<usize> = batch
            .iter()
            .filter_map(|event| match event {
                SessionEvent::RevealStarted { index } => Some(*index),
                _ => None,
            })
            .collect();

        let mut lines = Vec::new();
        for event in batch {
            match event {
                SessionEvent::TurnAppended { index, role } => {
                    if role == Role::User && echoed == Some(index) {
                        continue;
                    }
                    if revealing.contains(&index) {
                        continue;
                    }
                    if let Some(turn) = turns.get(index) {
                        lines.push(view::render_turn(turn));
                    }
                }
                SessionEvent::InputLocked => lines.push(view::THINKING_TEXT.to_string()),
                SessionEvent::DocumentAttached { name } => {
                    lines.push(format!("[{} attached]", name));
                }
                SessionEvent::DocumentCleared => lines.push("Document dismissed.".to_string()),
                SessionEvent::ScrollToLatest
                | SessionEvent::InputUnlocked
                | SessionEvent::RevealStarted { .. }
                | SessionEvent::RevealFinished { .. } => {}
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_session::{ChatSession, SubmitOutcome};

    fn feed() -> (mpsc::UnboundedSender<SessionEvent>, EventFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, EventFeed::new(rx))
    }

    #[test]
    fn test_revealed_turn_is_left_to_the_reveal() {
        let (tx, mut feed) = feed();
        let turns = vec![Turn::user("q"), Turn::assistant("Use **BFS**")];

        tx.send(SessionEvent::TurnAppended { index: 1, role: Role::Assistant }).unwrap();
        tx.send(SessionEvent::ScrollToLatest).unwrap();
        tx.send(SessionEvent::RevealStarted { index: 1 }).unwrap();

        assert!(feed.drain(&turns).is_empty());
    }

    #[test]
    fn test_lock_prints_thinking_and_echo_is_skipped() {
        let (tx, mut feed) = feed();
        let turns = vec![Turn::assistant("hello"), Turn::user("q")];

        feed.mark_echoed(1);
        tx.send(SessionEvent::TurnAppended { index: 1, role: Role::User }).unwrap();
        tx.send(SessionEvent::ScrollToLatest).unwrap();
        tx.send(SessionEvent::InputLocked).unwrap();

        assert_eq!(feed.drain(&turns), vec![view::THINKING_TEXT.to_string()]);
    }

    #[test]
    fn test_echo_mark_expires_after_one_drain() {
        let (tx, mut feed) = feed();
        let turns = vec![Turn::assistant("hello"), Turn::user("Processing file: cv.pdf")];

        feed.mark_echoed(1);
        assert!(feed.drain(&turns).is_empty());

        tx.send(SessionEvent::TurnAppended { index: 1, role: Role::User }).unwrap();
        tx.send(SessionEvent::DocumentAttached { name: "cv.pdf".into() }).unwrap();
        assert_eq!(
            feed.drain(&turns),
            vec!["you> Processing file: cv.pdf".to_string(), "[cv.pdf attached]".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_credential_error_is_printed() {
        let mut session = ChatSession::builder().api_key(None).build().unwrap();
        let mut feed = EventFeed::new(session.subscribe());

        feed.mark_echoed(session.turns().len());
        assert!(matches!(session.submit("What is a heap?"), SubmitOutcome::Rejected));

        let lines = feed.drain(session.turns());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("coach> ERROR: API key is missing."));
    }
}
