//! Message types for chat-completion requests

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction that frames the exchange
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,
    /// Text content
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        assert_eq!(Message::system("frame").role, Role::System);
        assert_eq!(Message::user("ask").role, Role::User);
        assert_eq!(Message::assistant("answer").content, "answer");
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(Message::user("Analyze TCS")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "user", "content": "Analyze TCS" }));
    }
}
