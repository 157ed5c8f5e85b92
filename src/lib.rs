pub mod config;
pub mod conversation;
pub mod error;
pub mod image;
pub mod llm;
pub mod locale;
pub mod session;
pub mod speech;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub use conversation::{Conversation, PendingTurn, TurnState};
pub use error::{ChatError, ConversationError, Result};
pub use session::{ChatSession, TurnOutcome};
pub use types::{ChatMessage, Language, MessageId, Sender};
