use reqwest::Method;
use serde::{Deserialize, Serialize};

use charchat_models::{
    sort_messages_by_time, Character, ChatMessage, ChatTurn, CreativitySettings, SessionId,
    SessionSummary,
};

use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    character_name: &'a str,
    user_input: &'a str,
    new_session: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a SessionId>,
    #[serde(flatten)]
    creativity: Option<&'a CreativitySettings>,
}

/// Wire shape of the `/chat` response: either the full updated history or a
/// single reply string. Normalized into [`ChatTurn`] before returning.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatResponseBody {
    History {
        chat_history: Vec<ChatMessage>,
        #[serde(default, alias = "conversation_id")]
        session_id: Option<SessionId>,
    },
    Reply {
        #[serde(alias = "response", alias = "message")]
        reply: String,
        #[serde(default, alias = "conversation_id")]
        session_id: Option<SessionId>,
    },
}

#[derive(Debug, Deserialize)]
struct SessionMessagesBody {
    #[serde(default, alias = "messages")]
    chat_history: Vec<ChatMessage>,
}

impl ApiClient {
    /// Send one user message to a character.
    ///
    /// When the backend returns a history array it is time-sorted before being
    /// handed back; a plain reply string becomes a single assistant message
    /// attributed to the character.
    pub async fn send_message(
        &self,
        character: &str,
        text: &str,
        new_session: bool,
        conversation_id: Option<&SessionId>,
        creativity: Option<&CreativitySettings>,
    ) -> Result<ChatTurn, ApiError> {
        let body = ChatRequestBody {
            character_name: character,
            user_input: text,
            new_session,
            conversation_id,
            creativity,
        };
        let builder = self.request(Method::POST, "/chat").json(&body);
        let response: ChatResponseBody = self.execute(builder).await?;

        Ok(match response {
            ChatResponseBody::History {
                mut chat_history,
                session_id,
            } => {
                sort_messages_by_time(&mut chat_history);
                ChatTurn {
                    messages: chat_history,
                    session_id,
                }
            }
            ChatResponseBody::Reply { reply, session_id } => ChatTurn {
                messages: vec![ChatMessage::from_character(character, reply)],
                session_id,
            },
        })
    }

    /// List the authenticated user's chat sessions
    pub async fn get_sessions(&self) -> Result<Vec<SessionSummary>, ApiError> {
        self.execute(self.request(Method::GET, "/get_sessions"))
            .await
    }

    /// Fetch the full message history for one session, time-sorted
    pub async fn get_session_messages(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        let builder = self
            .request(Method::GET, "/get_session_messages")
            .query(&[("session_id", session_id.to_string())]);
        let body: SessionMessagesBody = self.execute(builder).await?;

        let mut messages = body.chat_history;
        sort_messages_by_time(&mut messages);
        Ok(messages)
    }

    /// Delete one session
    pub async fn delete_session(&self, session_id: &SessionId) -> Result<(), ApiError> {
        let path = format!("/sessions/{}", session_id);
        let _: serde_json::Value = self.execute(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// Fetch one character's display data
    pub async fn get_character(&self, id: &str) -> Result<Character, ApiError> {
        let path = format!("/character/{}", id);
        self.execute(self.request(Method::GET, &path)).await
    }

    /// Update the authenticated user's preferences, returning the stored
    /// preference object
    pub async fn update_preferences(
        &self,
        preferences: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let builder = self
            .request(Method::PUT, "/user/preferences")
            .json(preferences);
        self.execute(builder).await
    }
}
