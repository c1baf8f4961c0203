// Plain-text rendering for the terminal. Everything returns strings so the
// chat loop stays the only place that writes to stdout.
use coach_session::reveal::{render_segments, stable_prefix_len, Segment};
use coach_types::{DashboardStats, DisplaySettings, Role, SummaryIndex, Theme, Turn};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub const NOT_PDF_TEXT: &str = "Please upload a PDF file.";
pub const FILE_READ_ERROR_TEXT: &str = "Sorry, there was an error reading the file.";
pub const BUSY_TEXT: &str = "Still answering, type /stop to cancel.";
pub const THINKING_TEXT: &str = "Coach is thinking...";

pub fn render_ansi(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Bold(text) => {
                out.push_str(BOLD);
                out.push_str(text);
                out.push_str(RESET);
            }
            Segment::LineBreak => out.push('\n'),
        }
    }
    out
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "coach",
    }
}

pub fn speaker_label(role: Role) -> String {
    format!("{}> ", speaker(role))
}

/// A whole turn, bold markers rendered
pub fn render_turn(turn: &Turn) -> String {
    format!(
        "{}{}",
        speaker_label(turn.role),
        render_ansi(&render_segments(&turn.text))
    )
}

/// Prints a revealing reply without ever reprinting
///
/// Only the part of each prefix whose rendering is final gets written, so a
/// `**` that is not closed yet is held back until its pair shows up.
#[derive(Debug, Default)]
pub struct FramePrinter {
    printed: usize,
}

impl FramePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// New output for the latest revealed prefix
    pub fn advance(&mut self, revealed: &str) -> String {
        let stable = stable_prefix_len(revealed);
        if stable <= self.printed {
            return String::new();
        }
        let chunk = render_ansi(&render_segments(&revealed[self.printed..stable]));
        self.printed = stable;
        chunk
    }

    /// Everything not printed yet
    pub fn finish(&mut self, full_text: &str) -> String {
        let start = self.printed.min(full_text.len());
        self.printed = full_text.len();
        render_ansi(&render_segments(&full_text[start..]))
    }
}

pub fn render_history(turns: &[Turn], summaries: &SummaryIndex, updating: bool) -> String {
    let mut out = String::from("Chat History\n");
    if updating {
        out.push_str("Updating summaries...\n");
    }

    let questions: Vec<&Turn> = turns.iter().filter(|t| t.is_user()).collect();
    if questions.is_empty() {
        out.push_str("No chat history yet. Start a conversation in the Playground!");
        return out;
    }

    for (i, turn) in questions.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {}{}{}\n     You asked: \"{}\" at {}\n",
            i + 1,
            BOLD,
            summaries.display_text(&turn.text),
            RESET,
            turn.text,
            turn.clock_time()
        ));
    }
    out.trim_end().to_string()
}

pub fn render_stats(stats: &DashboardStats) -> String {
    format!(
        "Dashboard\n  Total Questions Asked: {}\n  Avg. Response Length:  {} words\n  Topics Covered:        {}",
        stats.total_questions,
        stats.avg_response_words,
        stats.topics.join(", ")
    )
}

pub fn render_settings(settings: &DisplaySettings) -> String {
    let theme = match settings.theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
    };
    format!(
        "Settings\n  Appearance: {}\n  Language:   English\n  Font Size:  {}\n(set DISPLAY_THEME / DISPLAY_FONT_SIZE or config/default.toml to change)",
        theme,
        settings.font_size.label()
    )
}

pub const ABOUT_TEXT: &str = "\
About AI Interview Coach

AI Interview Coach is your companion for acing job interviews. Practice
behavioral questions, system design and coding interviews with real-time
AI feedback.

  - PDF resume analysis with instant feedback
  - Real-time AI interview questions and coaching
  - Track your progress and improve your answers
  - Powered by Google Gemini

Our mission is to make interview preparation accessible, efficient and
personalized for everyone, whether you're a student or a working professional.";
