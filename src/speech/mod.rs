//! Continuous speech-to-text input.
//!
//! A `SpeechBackend` drives the actual recognizer and reports what it hears
//! as `RecognizerEvent`s on an mpsc channel. `SpeechRecognizer` folds those
//! events into a listening state and a transcript of final results.

pub mod replay;

pub use replay::ReplayBackend;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::types::Language;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Recognizer error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid recognizer event on line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Whether the host can do speech input at all. Resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechCapability {
    Supported,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionAlternative {
    pub transcript: String,
    #[serde(default)]
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub is_final: bool,
    pub alternatives: Vec<RecognitionAlternative>,
}

impl RecognitionResult {
    pub fn final_text(text: &str) -> Self {
        Self {
            is_final: true,
            alternatives: vec![RecognitionAlternative {
                transcript: text.to_string(),
                confidence: 1.0,
            }],
        }
    }

    pub fn interim_text(text: &str) -> Self {
        Self {
            is_final: false,
            ..Self::final_text(text)
        }
    }
}

/// Notifications from a recognizer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecognizerEvent {
    Start,
    Result {
        #[serde(default)]
        result_index: usize,
        results: Vec<RecognitionResult>,
    },
    Error {
        message: String,
    },
    End,
}

/// Parameters for one recognizer session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub lang: Language,
    pub continuous: bool,
    pub interim_results: bool,
}

impl SessionConfig {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            continuous: true,
            interim_results: true,
        }
    }
}

pub trait SpeechBackend: Send {
    /// Begin a session. `Start` is reported on the event channel once the
    /// recognizer is actually listening.
    fn start(&mut self, config: &SessionConfig) -> Result<(), SpeechError>;

    /// Ask the session to end. Final results may still arrive before `End`.
    fn stop(&mut self) -> Result<(), SpeechError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListeningState {
    Idle,
    Starting,
    Listening,
    Stopping,
}

/// Effect of one recognizer event on the recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechUpdate {
    Started,
    /// Full transcript after appending new final text
    Transcript(String),
    /// Session over; carries the final transcript
    Ended(String),
    Failed(String),
    Ignored,
}

pub struct SpeechRecognizer {
    backend: Option<Box<dyn SpeechBackend>>,
    events: Option<mpsc::UnboundedReceiver<RecognizerEvent>>,
    state: ListeningState,
    transcript: String,
}

impl SpeechRecognizer {
    pub fn new(
        backend: Box<dyn SpeechBackend>,
        events: mpsc::UnboundedReceiver<RecognizerEvent>,
    ) -> Self {
        Self {
            backend: Some(backend),
            events: Some(events),
            state: ListeningState::Idle,
            transcript: String::new(),
        }
    }

    /// Recognizer for hosts without speech input; every operation is a no-op
    pub fn unsupported() -> Self {
        Self {
            backend: None,
            events: None,
            state: ListeningState::Idle,
            transcript: String::new(),
        }
    }

    pub fn capability(&self) -> SpeechCapability {
        if self.backend.is_some() {
            SpeechCapability::Supported
        } else {
            SpeechCapability::Unsupported
        }
    }

    /// Start a continuous session in `lang`. Ignored while a session is
    /// already running.
    pub fn start(&mut self, lang: Language) -> Result<(), SpeechError> {
        let Some(backend) = self.backend.as_mut() else {
            log::debug!("Speech input unsupported; ignoring start");
            return Ok(());
        };
        if self.state != ListeningState::Idle {
            log::debug!("Speech session already {:?}; ignoring start", self.state);
            return Ok(());
        }

        // Leftovers from a previous session must not reach this one
        if let Some(events) = self.events.as_mut() {
            while events.try_recv().is_ok() {}
        }

        self.transcript.clear();
        backend.start(&SessionConfig::new(lang))?;
        self.state = ListeningState::Starting;
        log::info!("🎤 Starting speech recognition ({})", lang);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), SpeechError> {
        if self.state != ListeningState::Listening {
            return Ok(());
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.stop()?;
        }
        self.state = ListeningState::Stopping;
        log::info!("🛑 Stopping speech recognition");
        Ok(())
    }

    pub fn handle_event(&mut self, event: RecognizerEvent) -> SpeechUpdate {
        match event {
            RecognizerEvent::Start => {
                if self.state != ListeningState::Starting {
                    return SpeechUpdate::Ignored;
                }
                self.state = ListeningState::Listening;
                SpeechUpdate::Started
            }
            RecognizerEvent::Result {
                result_index,
                results,
            } => {
                if self.state == ListeningState::Idle {
                    return SpeechUpdate::Ignored;
                }
                let segment: String = results
                    .iter()
                    .skip(result_index)
                    .filter(|result| result.is_final)
                    .filter_map(|result| result.alternatives.first())
                    .map(|alternative| alternative.transcript.as_str())
                    .collect();
                if segment.is_empty() {
                    return SpeechUpdate::Ignored;
                }
                if !self.transcript.is_empty() {
                    self.transcript.push(' ');
                }
                self.transcript.push_str(&segment);
                log::debug!("Transcript so far: {}", self.transcript);
                SpeechUpdate::Transcript(self.transcript.clone())
            }
            RecognizerEvent::Error { message } => {
                log::error!("❌ Speech recognition error: {}", message);
                self.state = ListeningState::Idle;
                SpeechUpdate::Failed(message)
            }
            RecognizerEvent::End => {
                if self.state == ListeningState::Idle {
                    return SpeechUpdate::Ignored;
                }
                self.state = ListeningState::Idle;
                log::info!("🎤 Speech recognition ended");
                SpeechUpdate::Ended(self.transcript.clone())
            }
        }
    }

    /// Apply every event already queued, without waiting
    pub fn poll_events(&mut self) -> Vec<SpeechUpdate> {
        let mut pending = Vec::new();
        if let Some(events) = self.events.as_mut() {
            while let Ok(event) = events.try_recv() {
                pending.push(event);
            }
        }
        pending
            .into_iter()
            .map(|event| self.handle_event(event))
            .collect()
    }

    /// Wait for the next event and apply it. Never resolves for an
    /// unsupported recognizer or once the backend has gone away.
    pub async fn next_update(&mut self) -> SpeechUpdate {
        let event = match self.events.as_mut() {
            Some(events) => events.recv().await,
            None => None,
        };
        match event {
            Some(event) => self.handle_event(event),
            None => std::future::pending().await,
        }
    }

    pub fn state(&self) -> ListeningState {
        self.state
    }

    /// True from the recognizer's `Start` until its `End`
    pub fn is_listening(&self) -> bool {
        matches!(
            self.state,
            ListeningState::Listening | ListeningState::Stopping
        )
    }

    /// True while any session is in progress, including before `Start`
    pub fn is_active(&self) -> bool {
        self.state != ListeningState::Idle
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn take_transcript(&mut self) -> String {
        std::mem::take(&mut self.transcript)
    }
}
