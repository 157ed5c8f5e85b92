use thiserror::Error;

use crate::config::ConfigError;
use crate::llm::client::LLMError;
use crate::llm::tools::ToolError;

pub type Result<T> = std::result::Result<T, ChatError>;

/// Failures that can end a single chat turn.
///
/// None of these are fatal to the process; the conversation downgrades each
/// one to a localized bot message.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(LLMError),

    #[error("Tool execution error: {0}")]
    ToolExecution(#[from] ToolError),

    #[error("Image encoding error: {0}")]
    ImageEncoding(String),
}

/// Rejections from the conversation state machine. Nothing is appended when
/// one of these is returned.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConversationError {
    #[error("A response is still outstanding")]
    Busy,

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Chat has not been started")]
    NotStarted,

    #[error("No quick option at position {0}")]
    UnknownOption(usize),
}

impl From<LLMError> for ChatError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::Config(config) => ChatError::Config(config),
            other => ChatError::Transport(other),
        }
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::ImageEncoding(err.to_string())
    }
}
