//! Generation backend for OpenAI-compatible `/chat/completions` endpoints.
//!
//! This is the hosted counterpart to the Ollama `/api/chat` generation
//! path: same `GenerationBackend` trait, different wire format and an
//! optional bearer token. The narration pipeline picks one of the two at
//! startup.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use hirehub_core::{defaults, Error, GenerationBackend, Result};

/// Default hosted chat-completions endpoint.
pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.atlascloud.ai/v1/chat/completions";

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct ChatCompletionsBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatCompletionMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatCompletionMessage,
}

impl ChatCompletionsBackend {
    /// Create a backend with the default model and timeout.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_config(
            endpoint,
            api_key,
            defaults::NARRATOR_MODEL,
            defaults::NARRATOR_TIMEOUT_SECS,
        )
    }

    /// Create a backend with explicit model and timeout.
    pub fn with_config(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
        }
    }

    /// Build from environment variables:
    /// - `HIREHUB_NARRATOR_URL` (default: the hosted endpoint)
    /// - `HIREHUB_NARRATOR_API_KEY` (optional bearer token)
    /// - `HIREHUB_NARRATOR_MODEL`
    /// - `HIREHUB_NARRATOR_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        let endpoint = std::env::var("HIREHUB_NARRATOR_URL")
            .unwrap_or_else(|_| DEFAULT_CHAT_COMPLETIONS_URL.to_string());
        let api_key = std::env::var("HIREHUB_NARRATOR_API_KEY").ok();
        let model = std::env::var("HIREHUB_NARRATOR_MODEL")
            .unwrap_or_else(|_| defaults::NARRATOR_MODEL.to_string());
        let timeout_secs = std::env::var("HIREHUB_NARRATOR_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults::NARRATOR_TIMEOUT_SECS);
        Self::with_config(endpoint, api_key, model, timeout_secs)
    }

    async fn request_completion(&self, messages: Vec<ChatCompletionMessage>) -> Result<String> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: defaults::NARRATOR_TEMPERATURE,
            max_tokens: defaults::NARRATOR_MAX_TOKENS,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Endpoint returned {}: {}",
                status, text
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Inference("response contained no choices".to_string()))
    }
}

#[async_trait]
impl GenerationBackend for ChatCompletionsBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    #[instrument(skip(self, system, prompt), fields(subsystem = "inference", component = "chat_completions", op = "generate", model = %self.model, prompt_len = prompt.len()))]
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let mut messages = Vec::new();
        if !system.is_empty() {
            messages.push(ChatCompletionMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatCompletionMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let content = self.request_completion(messages).await?;
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = content.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > 30000 {
            warn!(
                duration_ms = elapsed,
                prompt_len = prompt.len(),
                slow = true,
                "Slow generation operation"
            );
        }
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion_json(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn generate_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_json("Strong fit")))
            .mount(&server)
            .await;

        let backend =
            ChatCompletionsBackend::new(format!("{}/v1/chat/completions", server.uri()), None);
        let text = backend.generate("assess this candidate").await.unwrap();
        assert_eq!(text, "Strong fit");
    }

    #[tokio::test]
    async fn generate_sends_model_and_sampling_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("\"temperature\":0.5"))
            .and(body_string_contains("\"max_tokens\":500"))
            .and(body_string_contains(defaults::NARRATOR_MODEL))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_json("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let backend = ChatCompletionsBackend::new(server.uri(), None);
        backend.generate("assess this candidate").await.unwrap();
    }

    #[tokio::test]
    async fn generate_with_system_prepends_system_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("\"role\":\"system\""))
            .and(body_string_contains("You are a recruiter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_json("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let backend = ChatCompletionsBackend::new(server.uri(), None);
        backend
            .generate_with_system("You are a recruiter", "assess")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn generate_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let backend = ChatCompletionsBackend::new(server.uri(), None);
        let err = backend.generate("prompt").await.unwrap_err();
        match err {
            Error::Inference(msg) => assert!(msg.contains("503")),
            other => panic!("Expected Inference error, got: {}", other),
        }
    }

    #[tokio::test]
    async fn generate_maps_connection_error() {
        // Port 1 refuses connections.
        let backend = ChatCompletionsBackend::new("http://127.0.0.1:1/v1/chat/completions", None);
        let err = backend.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn generate_maps_unparseable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let backend = ChatCompletionsBackend::new(server.uri(), None);
        let err = backend.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }
}
