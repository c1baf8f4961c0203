use coach_app::commands::{Command, HELP_TEXT};
use coach_app::view::{render_turn, FramePrinter};
use coach_session::reveal::tokenize;
use coach_types::Turn;

#[test]
fn test_help_mentions_every_command() {
    for command in ["/upload", "/clear", "/stop", "/history", "/stats", "/settings", "/about", "/quit"] {
        assert!(HELP_TEXT.contains(command), "missing {}", command);
        let parsed = Command::parse(&format!("{} cv.pdf", command));
        assert!(
            !matches!(parsed, Command::Ask(_) | Command::Unknown(_)),
            "{} not recognised",
            command
        );
    }
}

#[test]
fn test_streamed_output_matches_whole_render() {
    let reply = "**Step 1:** sort the input.\n**Step 2:** use *two* pointers, then return **the pair**";

    let mut printer = FramePrinter::new();
    let mut streamed = String::new();
    let mut revealed = String::new();
    for token in tokenize(reply) {
        revealed.push_str(token);
        streamed.push_str(&printer.advance(&revealed));
    }
    streamed.push_str(&printer.finish(reply));

    let whole = render_turn(&Turn::assistant(reply));
    assert_eq!(format!("coach> {}", streamed), whole);
}
