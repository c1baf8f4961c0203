use regex::Regex;
use std::sync::LazyLock;

// Lazy match, single line: `.` does not cross line breaks
static BOLD_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").ok());

const BOLD_MARKER: &str = "**";

/// One renderable piece of a (possibly partial) reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Bold(String),
    LineBreak,
}

fn push_plain(segments: &mut Vec<Segment>, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            segments.push(Segment::LineBreak);
        }
        if !line.is_empty() {
            segments.push(Segment::Text(line.to_string()));
        }
    }
}

/// Render a revealed prefix
///
/// Only complete `**...**` pairs become bold. A dangling opener stays
/// literal text until its closer is revealed.
pub fn render_segments(prefix: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    if let Some(pattern) = BOLD_PATTERN.as_ref() {
        for captures in pattern.captures_iter(prefix) {
            let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            push_plain(&mut segments, &prefix[cursor..whole.start()]);
            segments.push(Segment::Bold(inner.as_str().to_string()));
            cursor = whole.end();
        }
    }

    push_plain(&mut segments, &prefix[cursor..]);
    segments
}

/// Escaped markup for rendered segments
pub fn to_html(segments: &[Segment]) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => html.push_str(&html_escape::encode_text(text)),
            Segment::Bold(text) => {
                html.push_str("<strong>");
                html.push_str(&html_escape::encode_text(text));
                html.push_str("</strong>");
            }
            Segment::LineBreak => html.push_str("<br>"),
        }
    }
    html
}

/// Byte length of the part of `prefix` whose rendering can no longer change
///
/// Everything before an opener that may still be closed by later text is
/// final. The boundary never falls inside a bold pair, so the stable part
/// can be rendered in independent chunks.
pub fn stable_prefix_len(prefix: &str) -> usize {
    let settled_end = BOLD_PATTERN
        .as_ref()
        .and_then(|pattern| pattern.find_iter(prefix).last())
        .map(|m| m.end())
        .unwrap_or(0);

    let tail = &prefix[settled_end..];
    // Openers on earlier lines can never close
    let line_start = tail.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let open_line = &tail[line_start..];

    if let Some(offset) = open_line.find(BOLD_MARKER) {
        return settled_end + line_start + offset;
    }
    if open_line.ends_with('*') {
        return prefix.len() - 1;
    }
    prefix.len()
}
