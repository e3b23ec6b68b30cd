pub mod http;

use async_trait::async_trait;
use crate::models::chatbot::ChatbotResponse;
use self::http::HttpChatbotClient;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatbotError {
    #[error("request to chatbot failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chatbot returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed chatbot response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid chatbot url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The remote service that interprets canteen commands.
#[async_trait]
pub trait ChatbotClient: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<ChatbotResponse, ChatbotError>;

    fn endpoint(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct ChatbotConfig {
    pub url: String,
}

pub fn new_client(config: &ChatbotConfig) -> Result<Arc<dyn ChatbotClient>, ChatbotError> {
    let client = HttpChatbotClient::from_config(config)?;
    Ok(Arc::new(client))
}
