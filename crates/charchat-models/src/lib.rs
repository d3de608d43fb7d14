//! Core data types for charchat
//!
//! This crate provides the message, session and character structures shared
//! between the API client and the terminal app.

pub mod types;

pub use types::{
    Character,
    ChatMessage,
    ChatSession,
    ChatTurn,
    CreativitySettings,
    SessionId,
    SessionSummary,
    sort_messages_by_time,
    USER_ROLE,
};
