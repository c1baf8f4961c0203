use std::path::Path;

use anyhow::{Context, Result};
use coach_session::{
    read_document, ChatSession, DocumentError, PdfExtractor, SubmitOutcome, SummaryWatcher,
};
use coach_types::DisplaySettings;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

use crate::commands::{Command, HELP_TEXT};
use crate::feed::EventFeed;
use crate::view::{self, FramePrinter};

type InputLines = Lines<BufReader<Stdin>>;

/// Why a wait for the service or the reveal ended early
enum Interrupt {
    Stop,
    /// Input closed while waiting
    Eof,
}

/// Line-oriented chat front end over stdin/stdout
pub struct ChatApp {
    session: ChatSession,
    feed: EventFeed,
    summaries: SummaryWatcher,
    display: DisplaySettings,
    out: Stdout,
}

impl ChatApp {
    pub fn new(mut session: ChatSession, display: DisplaySettings) -> Self {
        let feed = EventFeed::new(session.subscribe());
        let summaries = session.spawn_summaries();
        Self {
            session,
            feed,
            summaries,
            display,
            out: tokio::io::stdout(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        if let Some(greeting) = self.session.turns().first() {
            let text = view::render_turn(greeting);
            self.println(&text).await?;
        }
        if !self.session.has_credential() {
            self.println("(GEMINI_API_KEY is not set, answers are disabled)").await?;
        }
        self.println("Type /help for commands.").await?;

        loop {
            self.print_prompt().await?;
            // Ctrl-C at the prompt quits; while answering it stops
            let line = tokio::select! {
                line = lines.next_line() => line.context("Failed to read input")?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(line) = line else {
                break;
            };

            match Command::parse(&line) {
                Command::Ask(question) => {
                    if !self.ask(&question, &mut lines).await? {
                        break;
                    }
                }
                Command::Stop => {
                    // Nothing runs between prompts, but keep the state machine honest
                    self.session.stop();
                    self.flush_events().await?;
                }
                Command::Upload(path) => self.upload(&path).await?,
                Command::ClearDocument => {
                    if self.session.clear_document() {
                        self.flush_events().await?;
                    } else {
                        self.println("No document attached.").await?;
                    }
                }
                Command::History => {
                    let text = view::render_history(
                        self.session.turns(),
                        &self.summaries.snapshot(),
                        self.summaries.is_updating(),
                    );
                    self.println(&text).await?;
                }
                Command::Stats => {
                    let text = view::render_stats(&self.session.stats());
                    self.println(&text).await?;
                }
                Command::Settings => {
                    let text = view::render_settings(&self.display);
                    self.println(&text).await?;
                }
                Command::About => self.println(view::ABOUT_TEXT).await?,
                Command::Help => self.println(HELP_TEXT).await?,
                Command::Quit => break,
                Command::Unknown(input) => {
                    self.println(&format!("Unknown command {}. Type /help.", input)).await?;
                }
            }
        }

        tracing::info!("Chat loop finished");
        Ok(())
    }

    /// Returns false when input closed mid-answer
    async fn ask(&mut self, question: &str, lines: &mut InputLines) -> Result<bool> {
        self.feed.mark_echoed(self.session.turns().len());
        let outcome = self.session.submit(question);
        self.flush_events().await?;
        let pending = match outcome {
            SubmitOutcome::Ignored | SubmitOutcome::Rejected => return Ok(true),
            SubmitOutcome::Sent(pending) => pending,
        };

        let wait = pending.wait();
        tokio::pin!(wait);
        let interrupt = loop {
            tokio::select! {
                reply = &mut wait => {
                    let applied = self.session.complete(reply);
                    self.flush_events().await?;
                    if applied {
                        return self.reveal(lines).await;
                    }
                    return Ok(true);
                }
                _ = tokio::signal::ctrl_c() => break Interrupt::Stop,
                line = lines.next_line() => match Self::classify(line?) {
                    Some(interrupt) => break interrupt,
                    None => self.println(view::BUSY_TEXT).await?,
                },
            }
        };

        // The request task sees the cancellation and its result is discarded
        self.session.stop();
        self.flush_events().await?;
        Ok(matches!(interrupt, Interrupt::Stop))
    }

    async fn reveal(&mut self, lines: &mut InputLines) -> Result<bool> {
        let Some(mut frames) = self.session.take_reveal_frames() else {
            return Ok(true);
        };
        let full_text = self
            .session
            .turns()
            .last()
            .map(|turn| turn.text.clone())
            .unwrap_or_default();

        let label = view::speaker_label(coach_types::Role::Assistant);
        self.print(&label).await?;
        let mut printer = FramePrinter::new();

        let interrupt = loop {
            tokio::select! {
                frame = frames.next_frame() => match frame {
                    Some(frame) => {
                        let chunk = printer.advance(&frame.revealed);
                        self.print(&chunk).await?;
                    }
                    None => break None,
                },
                _ = tokio::signal::ctrl_c() => break Some(Interrupt::Stop),
                line = lines.next_line() => {
                    if let Some(interrupt) = Self::classify(line?) {
                        break Some(interrupt);
                    }
                }
            }
        };

        if interrupt.is_some() {
            self.session.stop();
        } else {
            self.session.reveal_settled().await;
        }

        let rest = printer.finish(&full_text);
        self.println(&rest).await?;
        self.flush_events().await?;
        Ok(!matches!(interrupt, Some(Interrupt::Eof)))
    }

    /// Lines typed while an answer is pending; only /stop and EOF matter
    fn classify(line: Option<String>) -> Option<Interrupt> {
        match line {
            None => Some(Interrupt::Eof),
            Some(line) if Command::parse(&line) == Command::Stop => Some(Interrupt::Stop),
            Some(_) => None,
        }
    }

    async fn upload(&mut self, path: &Path) -> Result<()> {
        let (name, bytes) = match read_document(path).await {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("File reading error: {}", e);
                return self.println(view::FILE_READ_ERROR_TEXT).await;
            }
        };

        match self.session.upload_document(&name, bytes, &PdfExtractor).await {
            Ok(_) => self.flush_events().await?,
            Err(DocumentError::NotPdf) => self.println(view::NOT_PDF_TEXT).await?,
            Err(e) => self.println(&e.to_string()).await?,
        }
        Ok(())
    }

    async fn print_prompt(&mut self) -> Result<()> {
        let label = match self.session.document() {
            Some(doc) => format!("[{}] {}", doc.name, view::speaker_label(coach_types::Role::User)),
            None => view::speaker_label(coach_types::Role::User),
        };
        self.print(&label).await
    }

    async fn flush_events(&mut self) -> Result<()> {
        for line in self.feed.drain(self.session.turns()) {
            self.println(&line).await?;
        }
        Ok(())
    }

    async fn print(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn println(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }
}
