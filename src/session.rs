use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::conversation::{Conversation, PendingTurn};
use crate::error::{ChatError, ConversationError};
use crate::image::ImageAttachment;
use crate::llm::AgroResponder;
use crate::locale;
use crate::types::{ChatMessage, Language};

/// What became of a submitted turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The bot message appended for this turn (reply or localized error)
    Delivered(ChatMessage),
    /// The conversation was reset while the reply was in flight
    Discarded,
}

/// Async driver for one conversation.
///
/// The conversation lock is taken to submit and again to complete, never
/// across the model call, so language switches and rendering stay responsive
/// while a reply is outstanding.
#[derive(Clone)]
pub struct ChatSession {
    conversation: Arc<Mutex<Conversation>>,
    responder: Arc<AgroResponder>,
}

impl ChatSession {
    pub fn new(responder: AgroResponder, language: Language) -> Self {
        Self {
            conversation: Arc::new(Mutex::new(Conversation::new(language))),
            responder: Arc::new(responder),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, Conversation> {
        self.conversation.lock().await
    }

    pub fn handle(&self) -> Arc<Mutex<Conversation>> {
        Arc::clone(&self.conversation)
    }

    pub async fn start(&self) {
        self.conversation.lock().await.start();
    }

    pub async fn set_language(&self, language: Language) {
        self.conversation.lock().await.set_language(language);
    }

    pub async fn toggle_language(&self) -> Language {
        let mut conversation = self.conversation.lock().await;
        conversation.toggle_language();
        conversation.language()
    }

    /// Submit a user turn and wait for its reply.
    ///
    /// Rejections leave the conversation untouched. Every accepted turn ends
    /// with exactly one bot message unless the conversation was reset first.
    pub async fn send_message(
        &self,
        text: &str,
        image: Option<ImageAttachment>,
    ) -> Result<TurnOutcome, ConversationError> {
        let pending = self.conversation.lock().await.submit(text, image)?;

        let outcome = self.complete(&pending).await;

        let mut conversation = self.conversation.lock().await;
        if !conversation.finish(pending, outcome) {
            return Ok(TurnOutcome::Discarded);
        }
        Ok(conversation
            .last_message()
            .cloned()
            .map_or(TurnOutcome::Discarded, TurnOutcome::Delivered))
    }

    /// Start the chat if needed and ask the FAQ query at `index`
    pub async fn send_faq(&self, index: usize) -> Result<TurnOutcome, ConversationError> {
        let query = {
            let mut conversation = self.conversation.lock().await;
            let link = locale::welcome(conversation.language())
                .faq_links
                .get(index)
                .ok_or(ConversationError::UnknownOption(index))?;
            conversation.start();
            link.query
        };
        self.send_message(query, None).await
    }

    /// Submit the text of starter menu option `index`
    pub async fn choose_menu_option(&self, index: usize) -> Result<TurnOutcome, ConversationError> {
        let text = {
            let conversation = self.conversation.lock().await;
            locale::menu_options(conversation.language())
                .get(index)
                .ok_or(ConversationError::UnknownOption(index))?
                .text
        };
        self.send_message(text, None).await
    }

    /// Encode any attachment, then ask the model. An unreadable image never
    /// reaches the model.
    async fn complete(&self, pending: &PendingTurn) -> Result<String, ChatError> {
        let payload = match pending.image() {
            Some(attachment) => Some(attachment.encode().await?),
            None => None,
        };

        self.responder
            .get_response(pending.utterance(), pending.history(), payload.as_ref())
            .await
    }
}
