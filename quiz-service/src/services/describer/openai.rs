//! OpenAI chat completions describer.
//!
//! Sends one user message with a text part and an `image_url` part. The
//! image is passed by URL; the model fetches it itself.

use super::{CardDescriber, GenerationError};
use crate::config::{ImageDetail, OpenAiConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use std::time::Duration;

/// OpenAI vision describer.
#[derive(Clone)]
pub struct OpenAiDescriber {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiDescriber {
    pub fn new(config: OpenAiConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn build_request<'a>(&'a self, prompt: &'a str, image_url: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_url,
                            detail: self.config.image_detail,
                        },
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl CardDescriber for OpenAiDescriber {
    async fn describe(&self, prompt: &str, image_url: &str) -> Result<String, GenerationError> {
        let request = self.build_request(prompt, image_url);
        let url = self.completions_url();

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            image_url = %image_url,
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .traced_post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(GenerationError::RateLimited);
            }

            return Err(GenerationError::ApiError(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::ApiError(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &api_response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "OpenAI usage"
            );
        }

        api_response.first_text().ok_or(GenerationError::EmptyResponse)
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
    detail: ImageDetail,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it has any.
    fn first_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use serde_json::json;

    fn describer() -> OpenAiDescriber {
        OpenAiDescriber::new(
            OpenAiConfig {
                api_key: Secret::new("sk-test".to_string()),
                base_url: "http://localhost/v1".to_string(),
                model: "gpt-4o".to_string(),
                max_tokens: 300,
                image_detail: ImageDetail::Auto,
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_request_shape() {
        let describer = describer();
        let request = describer.build_request("Describe it.", "https://img/large.jpg");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o",
                "max_tokens": 300,
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "Describe it." },
                        {
                            "type": "image_url",
                            "image_url": { "url": "https://img/large.jpg", "detail": "auto" }
                        }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_first_choice_wins() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "A small cleric." } },
                { "index": 1, "message": { "role": "assistant", "content": "Ignored." } }
            ]
        }))
        .unwrap();

        assert_eq!(response.first_text().as_deref(), Some("A small cleric."));
    }

    #[test]
    fn test_no_choices_yields_nothing() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();

        assert!(response.first_text().is_none());
    }
}
