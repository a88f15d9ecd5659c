pub mod numerology;
pub mod prompts;
pub mod tarot;

mod zodiac;

pub use zodiac::ZodiacSign;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::services::ServiceError;

/// OpenAI-compatible chat-completions client. Missing credentials disable
/// readings instead of failing startup; every call carries a bounded timeout
/// so a stuck upstream can only stall its own flow.
#[derive(Clone)]
pub struct GenerationClient {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl GenerationClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServiceError::Generation(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let api_key = self.api_key.as_deref().ok_or(ServiceError::GenerationDisabled)?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens: 800,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::Generation(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Generation(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ServiceError::Generation("empty completion".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_key: Option<&str>) -> GenerationConfig {
        GenerationConfig {
            api_key: api_key.map(str::to_string),
            api_base: "https://api.openai.com/v1/".to_string(),
            model: "gpt-4.1-2025-04-14".to_string(),
            request_timeout_secs: 60,
        }
    }

    #[test]
    fn test_disabled_without_key() {
        let client = GenerationClient::new(&test_config(None)).unwrap();
        assert!(!client.is_enabled());
    }

    #[tokio::test]
    async fn test_generate_without_key_is_unavailable() {
        let client = GenerationClient::new(&test_config(None)).unwrap();
        assert!(matches!(
            client.generate("prompt").await,
            Err(ServiceError::GenerationDisabled)
        ));
    }

    #[test]
    fn test_api_base_trailing_slash_is_trimmed() {
        let client = GenerationClient::new(&test_config(Some("key"))).unwrap();
        assert_eq!(client.api_base, "https://api.openai.com/v1");
    }
}
