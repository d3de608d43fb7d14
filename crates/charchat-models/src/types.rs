use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Role sentinel for user-authored messages. Assistant messages carry the
/// character name as their role instead of a fixed string.
pub const USER_ROLE: &str = "user";

/// Helper function to deserialize string or null values
pub fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        _ => Ok(String::new()),
    }
}

/// Helper function to deserialize a counter the backend may send as either a
/// number or a pre-formatted string ("2.1k")
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

/// Session identifier as issued by the backend (string or number)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionId::Number(n) => write!(f, "{}", n),
            SessionId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for SessionId {
    fn from(n: i64) -> Self {
        SessionId::Number(n)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId::Text(s.to_string())
    }
}

/// A single message in a conversation
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(deserialize_with = "deserialize_string_or_null", default)]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// Create a user message stamped with the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: USER_ROLE.to_string(),
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }

    /// Create an assistant message attributed to the given character
    pub fn from_character(character: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: character.into(),
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == USER_ROLE
    }
}

/// Sort messages ascending by timestamp.
///
/// The sort is stable; messages without a timestamp sort before timestamped
/// ones, so a list where no message carries a timestamp comes back in its
/// original order.
pub fn sort_messages_by_time(messages: &mut [ChatMessage]) {
    messages.sort_by_key(|m| m.timestamp);
}

/// The normalized result of one `/chat` exchange.
///
/// The backend answers either with a single reply string or with the full
/// updated history; both shapes collapse into this one message-list
/// representation before reaching callers.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub messages: Vec<ChatMessage>,
    pub session_id: Option<SessionId>,
}

/// A full conversation thread with one character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: SessionId,
    pub character: String,
    pub messages: Vec<ChatMessage>,
}

/// Summary row returned by the session listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(alias = "id", alias = "conversation_id")]
    pub session_id: SessionId,
    #[serde(default)]
    pub character: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,
}

/// Read-only character display data sourced from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "img", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub messages: Option<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub likes: Option<String>,
}

/// Optional generation parameters forwarded with a chat message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreativitySettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}
