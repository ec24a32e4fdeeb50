//! Message board model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::StoredDocument;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Announcement,
    Question,
    #[default]
    Discussion,
}

impl MessageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "announcement" => Some(MessageType::Announcement),
            "question" => Some(MessageType::Question),
            "discussion" => Some(MessageType::Discussion),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Active,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    /// RFC 3339
    pub timestamp: String,
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default)]
    pub replies: Vec<Message>,
}

impl Message {
    fn sort_key(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Messages of an optional type, newest first. Unparseable timestamps sort last.
pub fn newest_first(messages: Vec<Message>, message_type: Option<MessageType>) -> Vec<Message> {
    let mut filtered: Vec<Message> = messages
        .into_iter()
        .filter(|m| message_type.map_or(true, |t| m.message_type == t))
        .collect();
    filtered.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
    filtered
}

impl StoredDocument for Vec<Message> {
    const KEY: &'static str = "messages";

    fn default_document() -> Self {
        Vec::new()
    }
}

/// Request body for posting a message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
}

/// Query parameters for listing messages.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "type")]
    pub message_type: Option<String>,
}
