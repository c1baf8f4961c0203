mod common;

use coach_llm::{Completion, FailureKind};
use coach_session::{ChatSession, SummaryBatchFetcher, SubmitOutcome};
use coach_types::{SummaryEntry, SummaryFailure, PENDING_SUMMARY_TEXT};
use common::ScriptedClient;
use std::sync::Arc;
use std::time::Duration;

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_duplicate_texts_fetched_once() {
    let client = Arc::new(ScriptedClient::replying("Two Sum problem"));
    let mut fetcher = SummaryBatchFetcher::new(Some(client.clone()), "gemini-2.0-flash");

    let fetched = fetcher
        .reconcile(&texts(&["two sum problem", "two sum problem"]))
        .await;

    assert_eq!(fetched, 1);
    assert_eq!(client.calls(), 1);
    assert_eq!(
        fetcher.index().get("two sum problem"),
        Some(&SummaryEntry::Ready("Two Sum problem".to_string()))
    );

    // Already known texts are never requested again
    let fetched = fetcher
        .reconcile(&texts(&["two sum problem", "two sum problem"]))
        .await;
    assert_eq!(fetched, 0);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_summary_request_shape() {
    let client = Arc::new(ScriptedClient::replying("STAR answers\n"));
    let mut fetcher = SummaryBatchFetcher::new(Some(client.clone()), "gemini-2.0-flash");

    fetcher.reconcile(&texts(&["How do I use STAR?"])).await;

    let seen = client.seen();
    assert_eq!(seen[0].system_instruction(), None);
    assert_eq!(seen[0].messages.len(), 1);
    assert_eq!(
        client.prompt(0),
        "Summarize the following user query in 5 words or less, providing only the summary text:\n\n\"How do I use STAR?\""
    );
    assert_eq!(fetcher.index().display_text("How do I use STAR?"), "STAR answers");
}

#[tokio::test]
async fn test_fetched_in_log_order() {
    let client = Arc::new(ScriptedClient::new(|request| {
        let prompt = request.messages[0].content().to_string();
        Ok(Completion::from_text(format!("summary of {}", prompt.len())))
    }));
    let mut fetcher = SummaryBatchFetcher::new(Some(client.clone()), "m");

    fetcher.reconcile(&texts(&["b", "a", "b", "c"])).await;

    let order: Vec<String> = client
        .seen()
        .iter()
        .map(|r| r.messages[0].content().to_string())
        .collect();
    assert_eq!(order.len(), 3);
    assert!(order[0].ends_with("\"b\""));
    assert!(order[1].ends_with("\"a\""));
    assert!(order[2].ends_with("\"c\""));
}

#[tokio::test]
async fn test_failure_outcomes_are_cached() {
    let cases = [
        (
            ScriptedClient::failing(FailureKind::Http { status: 500 }),
            SummaryFailure::Rejected,
            "Could not summarize.",
        ),
        (
            ScriptedClient::failing(FailureKind::Network("reset".into())),
            SummaryFailure::Failed,
            "Summary failed.",
        ),
        (
            ScriptedClient::failing(FailureKind::Malformed("eof".into())),
            SummaryFailure::Failed,
            "Summary failed.",
        ),
        (
            ScriptedClient::new(|_| Ok(Completion::blocked(serde_json::json!({"blockReason": "SAFETY"})))),
            SummaryFailure::Unavailable,
            "Summary unavailable.",
        ),
        (
            ScriptedClient::replying(""),
            SummaryFailure::Unavailable,
            "Summary unavailable.",
        ),
        (
            ScriptedClient::new(|_| {
                Ok(Completion {
                    text: None,
                    candidate_count: 1,
                    prompt_feedback: None,
                })
            }),
            SummaryFailure::Unavailable,
            "Summary unavailable.",
        ),
    ];

    for (client, failure, text) in cases {
        let client = Arc::new(client);
        let mut fetcher = SummaryBatchFetcher::new(Some(client.clone()), "m");

        fetcher.reconcile(&texts(&["q"])).await;
        assert_eq!(fetcher.index().get("q"), Some(&SummaryEntry::Failed(failure)));
        assert_eq!(fetcher.index().display_text("q"), text);

        fetcher.reconcile(&texts(&["q"])).await;
        assert_eq!(client.calls(), 1, "failed summaries must not be retried");
    }
}

#[tokio::test]
async fn test_without_client_nothing_happens() {
    let mut fetcher = SummaryBatchFetcher::new(None, "m");
    assert_eq!(fetcher.reconcile(&texts(&["q"])).await, 0);
    assert!(fetcher.index().is_empty());
    assert_eq!(fetcher.index().display_text("q"), PENDING_SUMMARY_TEXT);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_follows_session() {
    let client = Arc::new(ScriptedClient::new(|request| {
        let prompt = request.messages.last().unwrap().content().to_string();
        if request.system_instruction().is_some() {
            Ok(Completion::from_text("Use a hash map."))
        } else {
            Ok(Completion::from_text(if prompt.contains("two sum") {
                "Two Sum"
            } else {
                "Other"
            }))
        }
    }));
    let mut session = ChatSession::builder()
        .config(coach_types::SessionConfig::new().with_reveal_tick(Duration::from_millis(5)))
        .client(client.clone())
        .build()
        .unwrap();
    let watcher = session.spawn_summaries();

    for _ in 0..2 {
        let SubmitOutcome::Sent(pending) = session.submit("two sum problem") else {
            panic!("expected a request");
        };
        let reply = pending.wait().await;
        session.complete(reply);
        session.reveal_settled().await;
    }

    let mut index = watcher.receiver();
    let ready = index
        .wait_for(|idx| idx.get("two sum problem").is_some_and(|e| e.is_settled()))
        .await
        .unwrap()
        .clone();
    assert_eq!(ready.display_text("two sum problem"), "Two Sum");

    tokio::time::sleep(Duration::from_millis(50)).await;
    let summary_calls = client
        .seen()
        .iter()
        .filter(|r| r.system_instruction().is_none())
        .count();
    assert_eq!(summary_calls, 1);
    assert!(!watcher.is_updating());
}
