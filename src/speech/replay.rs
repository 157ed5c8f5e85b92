//! Scripted recognizer that replays events from a file.
//!
//! The script is JSON lines, one `RecognizerEvent` per line. A line that is
//! not JSON is shorthand for a single final result with that text. Blank
//! lines separate sessions: each `start` plays the next session, framed by
//! `Start` and `End`. Lines beginning with `#` are comments.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::{
    RecognitionResult, RecognizerEvent, SessionConfig, SpeechBackend, SpeechError,
};

const DEFAULT_EVENT_DELAY: Duration = Duration::from_millis(300);

pub struct ReplayBackend {
    sessions: VecDeque<Vec<RecognizerEvent>>,
    sender: mpsc::UnboundedSender<RecognizerEvent>,
    delay: Duration,
    stop_requested: Arc<AtomicBool>,
}

impl ReplayBackend {
    /// Load a script file. Returns the backend and the receiver its events
    /// arrive on.
    pub fn open(
        path: impl AsRef<Path>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RecognizerEvent>), SpeechError> {
        let script = std::fs::read_to_string(path.as_ref())?;
        let backend = Self::from_script(&script)?;
        log::info!(
            "🎤 Loaded {} scripted speech session(s) from {}",
            backend.0.remaining_sessions(),
            path.as_ref().display()
        );
        Ok(backend)
    }

    pub fn from_script(
        script: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RecognizerEvent>), SpeechError> {
        let sessions = parse_script(script)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        Ok((
            Self {
                sessions,
                sender,
                delay: DEFAULT_EVENT_DELAY,
                stop_requested: Arc::new(AtomicBool::new(false)),
            },
            receiver,
        ))
    }

    /// Pause between replayed events
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn remaining_sessions(&self) -> usize {
        self.sessions.len()
    }
}

impl SpeechBackend for ReplayBackend {
    fn start(&mut self, config: &SessionConfig) -> Result<(), SpeechError> {
        let sender = self.sender.clone();
        let delay = self.delay;

        // Each session gets its own flag so a late stop cannot cut the next one
        let stop_requested = Arc::new(AtomicBool::new(false));
        self.stop_requested = Arc::clone(&stop_requested);

        let Some(events) = self.sessions.pop_front() else {
            log::warn!("Speech script exhausted");
            tokio::spawn(async move {
                let _ = sender.send(RecognizerEvent::Start);
                let _ = sender.send(RecognizerEvent::Error {
                    message: "no-speech".to_string(),
                });
            });
            return Ok(());
        };

        log::debug!(
            "Replaying {} events (lang {}, continuous {})",
            events.len(),
            config.lang,
            config.continuous
        );

        tokio::spawn(async move {
            if sender.send(RecognizerEvent::Start).is_err() {
                return;
            }
            for event in events {
                tokio::time::sleep(delay).await;
                if stop_requested.load(Ordering::SeqCst) {
                    break;
                }
                if sender.send(event).is_err() {
                    return;
                }
            }
            let _ = sender.send(RecognizerEvent::End);
        });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), SpeechError> {
        self.stop_requested.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn parse_script(script: &str) -> Result<VecDeque<Vec<RecognizerEvent>>, SpeechError> {
    let mut sessions = VecDeque::new();
    let mut current = Vec::new();

    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            if !current.is_empty() {
                sessions.push_back(std::mem::take(&mut current));
            }
            continue;
        }

        let event = if line.starts_with('{') {
            serde_json::from_str(line).map_err(|e| SpeechError::Parse {
                line: index + 1,
                reason: e.to_string(),
            })?
        } else {
            RecognizerEvent::Result {
                result_index: 0,
                results: vec![RecognitionResult::final_text(line)],
            }
        };
        current.push(event);
    }

    if !current.is_empty() {
        sessions.push_back(current);
    }
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sessions() {
        let script = "# demo\nhello\nworld\n\n\n{\"type\":\"error\",\"message\":\"aborted\"}\n";
        let sessions = parse_script(script).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].len(), 2);
        assert!(matches!(sessions[1][0], RecognizerEvent::Error { .. }));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_script("hello\n{not json").unwrap_err();
        assert!(matches!(err, SpeechError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            ReplayBackend::open("/no/such/script.jsonl"),
            Err(SpeechError::Io(_))
        ));
    }
}
