use agrobot::speech::{
    ListeningState, ReplayBackend, SpeechCapability, SpeechRecognizer, SpeechUpdate,
};
use agrobot::Language;
use std::io::Write;
use std::time::Duration;

fn replay(script: &str) -> SpeechRecognizer {
    let (backend, events) = ReplayBackend::from_script(script).unwrap();
    SpeechRecognizer::new(Box::new(backend.with_delay(Duration::ZERO)), events)
}

/// Drive the recognizer until the session ends, collecting every update
async fn run_session(recognizer: &mut SpeechRecognizer) -> Vec<SpeechUpdate> {
    let mut updates = Vec::new();
    while recognizer.is_active() {
        let update = tokio::time::timeout(Duration::from_secs(5), recognizer.next_update())
            .await
            .expect("speech session stalled");
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn test_final_results_are_joined() {
    let mut recognizer = replay("hello\nworld\n");
    recognizer.start(Language::En).unwrap();

    let updates = run_session(&mut recognizer).await;

    assert_eq!(updates.first(), Some(&SpeechUpdate::Started));
    assert_eq!(
        updates.last(),
        Some(&SpeechUpdate::Ended("hello world".to_string()))
    );
    assert_eq!(recognizer.transcript(), "hello world");
    assert_eq!(recognizer.state(), ListeningState::Idle);
}

#[tokio::test]
async fn test_interim_results_never_reach_transcript() {
    let script = r#"
{"type":"result","result_index":0,"results":[{"is_final":false,"alternatives":[{"transcript":"ra"}]}]}
{"type":"result","result_index":0,"results":[{"is_final":true,"alternatives":[{"transcript":"ragi","confidence":0.92},{"transcript":"rugby"}]}]}
{"type":"result","result_index":0,"results":[{"is_final":false,"alternatives":[{"transcript":"pri"}]}]}
"#;
    let mut recognizer = replay(script);
    recognizer.start(Language::Kn).unwrap();

    let updates = run_session(&mut recognizer).await;

    let transcripts: Vec<_> = updates
        .iter()
        .filter_map(|update| match update {
            SpeechUpdate::Transcript(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(transcripts, vec!["ragi"]);
    assert_eq!(recognizer.take_transcript(), "ragi");
    assert_eq!(recognizer.transcript(), "");
}

#[tokio::test]
async fn test_sessions_play_in_order_and_restart_clears() {
    let mut recognizer = replay("first words\n\nsecond words\n");

    recognizer.start(Language::En).unwrap();
    run_session(&mut recognizer).await;
    assert_eq!(recognizer.transcript(), "first words");

    recognizer.start(Language::En).unwrap();
    assert_eq!(recognizer.transcript(), "");
    run_session(&mut recognizer).await;
    assert_eq!(recognizer.transcript(), "second words");

    // Script exhausted: the session fails straight back to idle
    recognizer.start(Language::En).unwrap();
    let updates = run_session(&mut recognizer).await;
    assert!(matches!(updates.last(), Some(SpeechUpdate::Failed(_))));
}

#[tokio::test]
async fn test_recognizer_error_ends_session() {
    let mut recognizer = replay("{\"type\":\"error\",\"message\":\"not-allowed\"}\nlost words\n");
    recognizer.start(Language::En).unwrap();

    let updates = run_session(&mut recognizer).await;
    assert_eq!(
        updates.last(),
        Some(&SpeechUpdate::Failed("not-allowed".to_string()))
    );
    assert_eq!(recognizer.transcript(), "");
}

#[tokio::test]
async fn test_stop_ends_session() {
    let (backend, events) = ReplayBackend::from_script("one\ntwo\nthree\n").unwrap();
    let mut recognizer = SpeechRecognizer::new(
        Box::new(backend.with_delay(Duration::from_millis(20))),
        events,
    );
    recognizer.start(Language::En).unwrap();

    assert_eq!(recognizer.next_update().await, SpeechUpdate::Started);
    recognizer.stop().unwrap();
    assert_eq!(recognizer.state(), ListeningState::Stopping);
    assert!(recognizer.is_listening());

    let updates = run_session(&mut recognizer).await;
    assert!(matches!(updates.last(), Some(SpeechUpdate::Ended(_))));
    assert!(!recognizer.transcript().contains("three"));
}

#[tokio::test]
async fn test_replay_from_file() {
    let mut script = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
    writeln!(script, "# weather question").unwrap();
    writeln!(script, "weather in").unwrap();
    writeln!(script, "Mysuru").unwrap();

    let (backend, events) = ReplayBackend::open(script.path()).unwrap();
    assert_eq!(backend.remaining_sessions(), 1);

    let mut recognizer =
        SpeechRecognizer::new(Box::new(backend.with_delay(Duration::ZERO)), events);
    recognizer.start(Language::En).unwrap();
    run_session(&mut recognizer).await;

    assert_eq!(recognizer.transcript(), "weather in Mysuru");
}

#[test]
fn test_unsupported_host() {
    let mut recognizer = SpeechRecognizer::unsupported();
    assert_eq!(recognizer.capability(), SpeechCapability::Unsupported);

    recognizer.start(Language::Kn).unwrap();
    recognizer.stop().unwrap();
    assert!(!recognizer.is_active());
    assert_eq!(recognizer.transcript(), "");
}
