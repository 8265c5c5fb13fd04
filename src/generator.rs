use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Upstream failures; the detail is logged but never forwarded to callers
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to upstream API failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream API returned status {0}")]
    Upstream(StatusCode),
    #[error("upstream response was malformed: {0}")]
    Malformed(String),
    #[error("upstream returned empty content")]
    EmptyContent,
    #[error("generation worker pool is closed")]
    PoolClosed,
}

/// External collaborator that turns a prompt into generated text.
/// One attempt per call; retry policy is the caller's business (there is none).
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

// Chat completion request body
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

// Chat completion response, reduced to the fields we read
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
    content: Option<String>,
}

/// Story generator backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(api_url: String, api_key: String, model: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to construct HTTP client");
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl StoryGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: 600,
            temperature: 0.85,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Upstream(status));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GenerationError::EmptyContent);
        }
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator_for(server: &mockito::ServerGuard) -> OpenAiGenerator {
        OpenAiGenerator::new(
            server.url(),
            "test-key".to_string(),
            "gpt-3.5-turbo".to_string(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn parses_and_trims_completion_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"  A heist goes wrong.  "}}]}"#,
            )
            .create_async()
            .await;

        let storyline = generator_for(&server).generate("prompt").await.unwrap();
        assert_eq!(storyline, "A heist goes wrong.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_content_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"   "}}]}"#)
            .create_async()
            .await;

        let err = generator_for(&server).generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyContent));
    }

    #[tokio::test]
    async fn missing_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = generator_for(&server).generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyContent));
    }

    #[tokio::test]
    async fn upstream_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let err = generator_for(&server).generate("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Upstream(status) if status == StatusCode::TOO_MANY_REQUESTS
        ));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = generator_for(&server).generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }
}
