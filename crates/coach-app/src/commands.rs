use std::path::PathBuf;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a slash command is a question
    Ask(String),
    Stop,
    Upload(PathBuf),
    ClearDocument,
    History,
    Stats,
    Settings,
    About,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Ask(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "stop" => Self::Stop,
            "upload" if !arg.is_empty() => Self::Upload(PathBuf::from(arg)),
            "clear" => Self::ClearDocument,
            "history" => Self::History,
            "stats" | "dashboard" => Self::Stats,
            "settings" => Self::Settings,
            "about" => Self::About,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

pub const HELP_TEXT: &str = "\
Type a question and press Enter. Commands:
  /upload <file.pdf>  attach a PDF; its text prefixes your next questions
  /clear              dismiss the attached PDF
  /stop               stop the current answer (Ctrl-C works too)
  /history            questions asked so far, with short summaries
  /stats              dashboard figures
  /settings           display settings
  /about              about this coach
  /quit               leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_question() {
        assert_eq!(
            Command::parse("What is a heap?"),
            Command::Ask("What is a heap?".to_string())
        );
    }

    #[test]
    fn test_commands() {
        assert_eq!(Command::parse("/stop"), Command::Stop);
        assert_eq!(Command::parse("  /history "), Command::History);
        assert_eq!(Command::parse("/dashboard"), Command::Stats);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/clear"), Command::ClearDocument);
    }

    #[test]
    fn test_upload_takes_path() {
        assert_eq!(
            Command::parse("/upload  ~/docs/my resume.pdf "),
            Command::Upload(PathBuf::from("~/docs/my resume.pdf"))
        );
        assert_eq!(Command::parse("/upload"), Command::Unknown("/upload".to_string()));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("/frobnicate now"),
            Command::Unknown("/frobnicate now".to_string())
        );
    }
}
