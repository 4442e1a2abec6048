//! Conversational chat endpoints.

use serde::{Deserialize, Serialize};

use crate::api::client::ApiClient;
use crate::api::page::Page;
use crate::error::ApiError;

const CHAT_PATH: &str = "/api/llm/chat/";
const CONVERSATIONS_PATH: &str = "/api/llm/conversations/";

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    conversation_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    pub id: Option<u64>,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub conversation_id: u64,
    pub user_message: ChatMessage,
    pub ai_message: ChatMessage,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conversation {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ApiClient {
    /// Send a message, continuing `conversation_id` when given.
    pub async fn chat(&self, message: &str, conversation_id: Option<u64>) -> Result<ChatReply, ApiError> {
        self.post_json(CHAT_PATH, &ChatRequest { message, conversation_id }).await
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        let page: Page<Conversation> = self.get_json(CONVERSATIONS_PATH).await?;
        Ok(page.into_items())
    }
}
