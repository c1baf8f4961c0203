use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::markup::{render_segments, to_html, Segment};
use super::tokens::tokenize;

/// Snapshot of a reply after one more token was revealed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealFrame {
    /// Tokens shown so far, starting at 1
    pub step: usize,
    pub total: usize,
    pub revealed: String,
}

impl RevealFrame {
    pub fn segments(&self) -> Vec<Segment> {
        render_segments(&self.revealed)
    }

    pub fn html(&self) -> String {
        to_html(&self.segments())
    }

    pub fn is_last(&self) -> bool {
        self.step == self.total
    }
}

/// Frames of one running reveal, consumed by the view
#[derive(Debug)]
pub struct RevealFrames {
    rx: mpsc::UnboundedReceiver<RevealFrame>,
}

impl RevealFrames {
    /// Next frame, `None` once the reveal finished or was cancelled
    pub async fn next_frame(&mut self) -> Option<RevealFrame> {
        self.rx.recv().await
    }

    pub fn try_next_frame(&mut self) -> Option<RevealFrame> {
        self.rx.try_recv().ok()
    }
}

/// Control side of a running reveal
///
/// Dropping the handle stops the animation. Completion is reported through
/// the `on_done` callback given to [`TextRevealAnimator::animate`], never
/// for a cancelled reveal.
#[derive(Debug)]
pub struct RevealHandle {
    full_text: String,
    cancel: CancellationToken,
    frames: Option<RevealFrames>,
    task: JoinHandle<()>,
}

impl RevealHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The reply being revealed, shown in full when the reveal is stopped
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Take the frame stream; only the first call returns it
    pub fn take_frames(&mut self) -> Option<RevealFrames> {
        self.frames.take()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Reveals a reply one token per tick
#[derive(Debug, Clone, Copy)]
pub struct TextRevealAnimator {
    tick: Duration,
}

impl TextRevealAnimator {
    pub fn new(tick: Duration) -> Self {
        Self {
            tick: tick.max(Duration::from_millis(1)),
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Start revealing `full_text`
    ///
    /// Every tick appends the next token and publishes the whole prefix.
    /// `on_done` runs exactly once, right after the last token, unless the
    /// handle is cancelled first. Must be called inside a Tokio runtime.
    pub fn animate<F>(&self, full_text: impl Into<String>, on_done: F) -> RevealHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let full_text = full_text.into();
        let tokens: Vec<String> = tokenize(&full_text).into_iter().map(String::from).collect();
        let total = tokens.len();
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let tick = self.tick;

        let task = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                let mut ticker = tokio::time::interval(tick);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // First tick of an interval fires immediately
                ticker.tick().await;

                let mut revealed = String::with_capacity(tokens.iter().map(String::len).sum());
                for (i, token) in tokens.into_iter().enumerate() {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            tracing::debug!("REVEAL: cancelled at token {}/{}", i, total);
                            return;
                        }
                        _ = ticker.tick() => {}
                    }

                    revealed.push_str(&token);
                    // Nobody watching is fine, the reveal still has to finish
                    let _ = tx.send(RevealFrame {
                        step: i + 1,
                        total,
                        revealed: revealed.clone(),
                    });
                }

                if cancel.is_cancelled() {
                    return;
                }
                tracing::debug!("REVEAL: finished after {} tokens", total);
                on_done();
            }
        });

        RevealHandle {
            full_text,
            cancel,
            frames: Some(RevealFrames { rx }),
            task,
        }
    }
}

impl Default for TextRevealAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_prefixes_grow_until_full_text() {
        let (done, on_done) = counter();
        let mut handle = TextRevealAnimator::default().animate("a **b** c", on_done);
        let mut frames = handle.take_frames().unwrap();

        let mut previous = String::new();
        let mut last = None;
        while let Some(frame) = frames.next_frame().await {
            assert!(frame.revealed.len() > previous.len());
            assert!(frame.revealed.starts_with(&previous));
            previous = frame.revealed.clone();
            last = Some(frame);
        }

        let last = last.unwrap();
        assert!(last.is_last());
        assert_eq!(last.revealed, "a **b** c");
        assert_eq!(
            last.segments(),
            vec![
                Segment::Text("a ".into()),
                Segment::Bold("b".into()),
                Segment::Text(" c".into()),
            ]
        );
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_token_per_tick() {
        let (_done, on_done) = counter();
        let mut handle = TextRevealAnimator::new(Duration::from_millis(50)).animate("x y", on_done);
        let mut frames = handle.take_frames().unwrap();

        let start = tokio::time::Instant::now();
        let first = frames.next_frame().await.unwrap();
        assert_eq!(first.revealed, "x");
        assert_eq!(start.elapsed(), Duration::from_millis(50));

        let second = frames.next_frame().await.unwrap();
        assert_eq!(second.revealed, "x ");
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_on_done() {
        let (done, on_done) = counter();
        let mut handle = TextRevealAnimator::default().animate("one two three four", on_done);
        let mut frames = handle.take_frames().unwrap();

        frames.next_frame().await.unwrap();
        handle.cancel();
        while frames.next_frame().await.is_some() {}

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(done.load(Ordering::SeqCst), 0);
        assert_eq!(handle.full_text(), "one two three four");
    }

    #[tokio::test(start_paused = true)]
    async fn test_finishes_without_a_reader() {
        let (done, on_done) = counter();
        let handle = TextRevealAnimator::default().animate("nobody is watching", on_done);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(handle.is_finished());
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_completes() {
        let (done, on_done) = counter();
        let _handle = TextRevealAnimator::default().animate("", on_done);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
