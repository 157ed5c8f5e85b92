//! Shared conversation types.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Who authored a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Role name used by the model's turn history
    pub fn model_role(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "model",
        }
    }
}

/// Conversation language. The string form is the BCP-47 tag, which doubles as
/// the speech recognition language.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum Language {
    #[default]
    #[strum(to_string = "en-US", serialize = "en", serialize = "EN")]
    En,
    #[strum(to_string = "kn-IN", serialize = "kn", serialize = "KN")]
    Kn,
}

impl Language {
    /// The other language, for the header toggle
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Kn,
            Language::Kn => Language::En,
        }
    }

    /// Native name shown on the toggle button
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Kn => "ಕನ್ನಡ",
        }
    }
}

/// Per-conversation message identifier, allocated from a monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Reference to a locally displayed image attached to a user turn.
///
/// Only the reference is stored; the display slot itself is owned by an
/// [`crate::image::DisplayHandle`] and released independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub handle: u64,
    pub file_name: String,
}

/// One turn of the conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub image: Option<ImageRef>,
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// Image bytes ready to be sent as an inline-data part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Base64 encoded bytes
    pub data: String,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_language_tags() {
        assert_eq!(Language::En.to_string(), "en-US");
        assert_eq!(Language::Kn.to_string(), "kn-IN");
        assert_eq!(Language::from_str("kn").unwrap(), Language::Kn);
        assert_eq!(Language::from_str("en-US").unwrap(), Language::En);
        assert!(Language::from_str("fr").is_err());
        assert_eq!(Language::iter().count(), 2);
    }

    #[test]
    fn test_language_toggle() {
        assert_eq!(Language::En.toggled(), Language::Kn);
        assert_eq!(Language::Kn.toggled().toggled(), Language::Kn);
    }

    #[test]
    fn test_sender_roles() {
        assert_eq!(Sender::User.model_role(), "user");
        assert_eq!(Sender::Bot.model_role(), "model");
        assert_eq!(Sender::Bot.to_string(), "bot");
    }

    #[test]
    fn test_message_id_display() {
        assert_eq!(MessageId(7).to_string(), "msg-7");
        assert!(MessageId(1) < MessageId(2));
    }
}
