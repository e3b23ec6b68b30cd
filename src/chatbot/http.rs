use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use url::Url;

use super::{ ChatbotClient, ChatbotConfig, ChatbotError };
use crate::models::chatbot::{ ChatbotRequest, ChatbotResponse };

#[derive(Debug, Clone)]
pub struct HttpChatbotClient {
    http: HttpClient,
    url: Url,
}

impl HttpChatbotClient {
    pub fn new(url: Url) -> Self {
        Self {
            http: HttpClient::new(),
            url,
        }
    }

    pub fn from_config(config: &ChatbotConfig) -> Result<Self, ChatbotError> {
        let url = Url::parse(config.url.trim())?;
        Ok(Self::new(url))
    }
}

#[async_trait]
impl ChatbotClient for HttpChatbotClient {
    async fn send_message(&self, text: &str) -> Result<ChatbotResponse, ChatbotError> {
        let req = ChatbotRequest {
            message: text.to_string(),
        };
        debug!("POST {} ({} chars)", self.url, text.chars().count());

        let resp = self.http.post(self.url.clone()).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatbotError::Status { status, body });
        }

        // Decoded from text so a malformed body is told apart from a transport error.
        let body = resp.text().await?;
        let data = serde_json::from_str::<ChatbotResponse>(&body)?;
        Ok(data)
    }

    fn endpoint(&self) -> String {
        self.url.to_string()
    }
}
