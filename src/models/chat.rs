use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::ConnectionId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub message_id: String,
    pub connection_id: ConnectionId,
    pub role_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages_from(&self, connection_id: &str) -> Vec<&ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.connection_id == connection_id)
            .collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl ChatMessage {
    pub fn new(connection_id: ConnectionId, role_name: String, content: String) -> Self {
        ChatMessage {
            message_id: uuid::Uuid::new_v4().to_string(),
            connection_id,
            role_name,
            content,
            timestamp: Utc::now(),
        }
    }
}
