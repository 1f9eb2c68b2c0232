/// LLM Client — the single point of entry for all completion calls in the trainer API.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// Callers depend on the `CompletionProvider` trait so tests can substitute a stub.
///
/// One call per `complete`; retrying is the caller's job (see `generation::retry`).
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Model and transport settings, passed explicitly so nothing is hard-coded.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix.
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// A text-completion backend that is asked for JSON-only output.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one system instruction plus one user prompt and returns the raw text reply.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it carries any non-blank content.
    fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP client for the Groq chat-completions endpoint (OpenAI wire format).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Maps a non-success response to `LlmError::Api`, preferring the provider's
/// `{"error": {"message"}}` envelope and falling back to the raw body.
fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// Applying it twice gives the same result as applying it once.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .unwrap_or(stripped)
                .trim()
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"template\": \"PPL_X2\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"template\": \"PPL_X2\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"sessions\": []}\n```";
        assert_eq!(strip_json_fences(input), "{\"sessions\": []}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"sessions\": []}\n";
        assert_eq!(strip_json_fences(input), "{\"sessions\": []}");
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        let input = "```json\n{\"sessions\": []}";
        assert_eq!(strip_json_fences(input), "{\"sessions\": []}");
    }

    #[test]
    fn test_strip_json_fences_is_idempotent() {
        for input in [
            "```json\n{\"a\": 1}\n```",
            "```\n{\"a\": 1}\n```",
            "{\"a\": 1}",
            "\n\n```json {\"a\": 1} ```\n",
        ] {
            let once = strip_json_fences(input);
            assert_eq!(strip_json_fences(once), once);
        }
    }

    #[test]
    fn test_api_error_uses_envelope_message() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "tokens"}}"#;
        match api_error(429, body.to_string()) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        match api_error(502, "<html>Bad Gateway</html>".to_string()) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>Bad Gateway</html>");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_chat_response_text_skips_blank_content() {
        let blank: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "content": "   " } }]
        }))
        .unwrap();
        assert!(blank.text().is_none());

        let missing: ChatResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert!(missing.text().is_none());

        let ok: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{ "message": { "content": " {\"a\":1} " } }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 4 }
        }))
        .unwrap();
        assert_eq!(ok.text(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = LlmClient::new(LlmConfig {
            api_url: "https://api.groq.com/openai/v1/".to_string(),
            api_key: "test".to_string(),
            model: "test-model".to_string(),
            temperature: 0.2,
            max_tokens: 1000,
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(client.model(), "test-model");
    }
}
