use crate::transcript::{Message, Role, Transcript};
use anyhow::{Context, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// System message prepended to every chat request.
pub const PERSONA: &str =
    "Tumhara naam MiniMi hai. Tum Hindi, Bengali aur English bolte ho. Hamesha dosti se jawab do.";

pub const DEFAULT_CHAT_API_BASE: &str = "http://localhost:1337/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";

/// A role/content pair as sent to the chat-completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

/// Any backend that turns a message list into a single reply.
///
/// The assistant only depends on this trait, so tests drive it with
/// `MockChatCompletion` instead of a live service.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Builds the outbound message list for a chat turn: the persona, the
/// transcript without image entries, then the new utterance.
pub fn build_chat_request(transcript: &Transcript, utterance: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 2);
    messages.push(ChatMessage::from(&Message::system(PERSONA)));
    messages.extend(transcript.chat_history().map(ChatMessage::from));
    messages.push(ChatMessage::from(&Message::user(utterance)));
    messages
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
}

impl ChatClient {
    pub fn new(base_url: String, api_key: Option<SecretString>, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            "sending chat completion request"
        );

        let resp = request
            .send()
            .await
            .context("chat completion request failed")?
            .error_for_status()
            .context("chat completion service returned an error status")?
            .json::<LlmResponse>()
            .await
            .context("failed to decode chat completion response")?;

        let answer = &resp
            .choices
            .first()
            .ok_or_else(|| anyhow::anyhow!("No response from LLM"))?
            .message
            .content;
        Ok(answer.clone())
    }
}
