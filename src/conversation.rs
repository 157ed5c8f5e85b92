//! Conversation state machine: message history, loading flag, starter menu.
//!
//! A conversation is either idle or awaiting exactly one response. Every
//! reset bumps an epoch; a completion started under an older epoch is dropped
//! instead of leaking into the fresh conversation.

use crate::error::{ChatError, ConversationError};
use crate::image::{DisplayHandle, DisplayHandles, ImageAttachment};
use crate::locale;
use crate::types::{ChatMessage, ImageRef, Language, MessageId, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingResponse,
}

/// A submitted user turn whose reply has not arrived yet.
///
/// Owns the display handle of any attached image, so the handle is released
/// however the turn ends.
#[derive(Debug)]
pub struct PendingTurn {
    epoch: u64,
    utterance: String,
    history: Vec<ChatMessage>,
    image: Option<(ImageAttachment, DisplayHandle)>,
}

impl PendingTurn {
    pub fn utterance(&self) -> &str {
        &self.utterance
    }

    /// Turns that preceded this one, excluding the new user message
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn image(&self) -> Option<&ImageAttachment> {
        self.image.as_ref().map(|(attachment, _)| attachment)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    loading: bool,
    show_menu: bool,
    language: Language,
    started: bool,
    epoch: u64,
    next_id: u64,
    display: DisplayHandles,
}

impl Conversation {
    /// A conversation on the welcome screen; nothing is seeded until `start`.
    pub fn new(language: Language) -> Self {
        Self {
            messages: Vec::new(),
            loading: false,
            show_menu: true,
            language,
            started: false,
            epoch: 0,
            next_id: 0,
            display: DisplayHandles::new(),
        }
    }

    /// Leave the welcome screen. No-op once started.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.reset();
    }

    /// Switch language; an already started chat is reset in the new language.
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        log::info!("🌐 Switching language {} -> {}", self.language, language);
        self.language = language;
        if self.started {
            self.reset();
        }
    }

    pub fn toggle_language(&mut self) {
        self.set_language(self.language.toggled());
    }

    /// Discard all messages and seed a single greeting.
    ///
    /// An outstanding response is not cancelled: the loading flag stays set
    /// until it lands and is dropped, so submissions remain `Busy` meanwhile.
    pub fn reset(&mut self) {
        if self.loading {
            log::warn!(
                "Resetting with a response outstanding; it will be discarded (epoch {})",
                self.epoch
            );
        }
        self.epoch += 1;
        self.messages.clear();
        self.show_menu = true;
        let greeting = locale::greeting(self.language).to_string();
        self.push(Sender::Bot, greeting, None);
    }

    /// Idle -> AwaitingResponse. Appends the user message and snapshots the
    /// history that precedes it.
    pub fn submit(
        &mut self,
        text: &str,
        image: Option<ImageAttachment>,
    ) -> Result<PendingTurn, ConversationError> {
        if !self.started {
            return Err(ConversationError::NotStarted);
        }
        if self.loading {
            return Err(ConversationError::Busy);
        }
        if text.trim().is_empty() && image.is_none() {
            return Err(ConversationError::EmptyMessage);
        }

        log::info!("📊 User action: {}", text);

        self.show_menu = false;
        let history = self.messages.clone();

        let image = image.map(|attachment| {
            let handle = self.display.acquire(&attachment);
            (attachment, handle)
        });
        let image_ref = image.as_ref().map(|(_, handle)| handle.image_ref());

        self.push(Sender::User, text.to_string(), image_ref);
        self.loading = true;

        Ok(PendingTurn {
            epoch: self.epoch,
            utterance: text.to_string(),
            history,
            image,
        })
    }

    /// AwaitingResponse -> Idle with the model's reply. Returns false when the
    /// turn belongs to a conversation that has since been reset; the reply is
    /// dropped but the conversation still goes back to idle.
    pub fn resolve(&mut self, pending: PendingTurn, reply: String) -> bool {
        if !self.accepts(&pending) {
            return false;
        }
        let text = if reply.trim().is_empty() {
            locale::did_not_understand(self.language).to_string()
        } else {
            reply
        };
        self.push(Sender::Bot, text, None);
        self.loading = false;
        true
    }

    /// AwaitingResponse -> Idle with a localized error message. The error
    /// detail is logged, never shown.
    pub fn fail(&mut self, pending: PendingTurn, error: &ChatError) -> bool {
        if !self.accepts(&pending) {
            return false;
        }
        log::error!("❌ Turn failed: {}", error);
        let text = match error {
            ChatError::ImageEncoding(_) => locale::image_processing_failed(self.language),
            _ => locale::connection_trouble(self.language),
        };
        self.push(Sender::Bot, text.to_string(), None);
        self.loading = false;
        true
    }

    pub fn finish(&mut self, pending: PendingTurn, outcome: Result<String, ChatError>) -> bool {
        match outcome {
            Ok(reply) => self.resolve(pending, reply),
            Err(error) => self.fail(pending, &error),
        }
    }

    fn accepts(&mut self, pending: &PendingTurn) -> bool {
        if pending.epoch != self.epoch {
            log::warn!(
                "Dropping stale response from epoch {} (current epoch {})",
                pending.epoch,
                self.epoch
            );
            // Only one turn is ever outstanding, so this was it
            self.loading = false;
            return false;
        }
        true
    }

    fn push(&mut self, sender: Sender, text: String, image: Option<ImageRef>) {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            text,
            sender,
            image,
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> TurnState {
        if self.loading {
            TurnState::AwaitingResponse
        } else {
            TurnState::Idle
        }
    }

    pub fn show_menu(&self) -> bool {
        self.show_menu
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn display_handles(&self) -> &DisplayHandles {
        &self.display
    }
}
