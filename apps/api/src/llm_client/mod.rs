/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the model API directly.
/// Chat and plan generation both go through `LlmClient::call`.
///
/// Speaks the OpenAI-compatible chat completions contract:
/// `{ model, messages: [{role, content}] }` in, `{ choices: [{ message }] }` out.
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::chat::ChatMessage;

pub mod prompts;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response is missing choices[0].message")]
    MissingMessage,

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Gave up after {retries} retries")]
    RetriesExhausted { retries: u32 },
}

/// Connection and retry policy for the model API.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    /// Per-attempt timeout. A hung upstream fails the attempt instead of the request hanging.
    pub timeout: Duration,
    /// Retries on transport errors, 429 and 5xx. Zero means a single attempt.
    pub max_retries: u32,
    /// Backoff before retry `n` is `retry_base_delay * 2^(n-1)`.
    pub retry_base_delay: Duration,
}

impl LlmSettings {
    /// Delay before retry `attempt` (1-based). Saturates instead of overflowing.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.retry_base_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client shared by chat and plan generation.
/// Wraps the chat completions API with a timeout and bounded retry.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: Arc<LlmSettings>,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            settings: Arc::new(settings),
        })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Sends the messages and returns the text of `choices[0].message`.
    /// Retries on timeouts, transport errors, 429 and 5xx with exponential backoff.
    /// Other 4xx responses and malformed bodies fail immediately.
    pub async fn call(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request_body = CompletionRequest {
            model: &self.settings.model,
            messages,
        };

        debug!(
            model = %self.settings.model,
            message_count = messages.len(),
            "Sending completion request"
        );

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=self.settings.max_retries {
            if attempt > 0 {
                let delay = self.settings.backoff(attempt);
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.settings.api_url)
                .bearer_auth(&self.settings.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if e.is_timeout() => {
                    last_error = Some(LlmError::Timeout {
                        secs: self.settings.timeout.as_secs(),
                    });
                    continue;
                }
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            return parse_completion(&body);
        }

        Err(last_error.unwrap_or(LlmError::RetriesExhausted {
            retries: self.settings.max_retries,
        }))
    }
}

fn parse_completion(body: &str) -> Result<String, LlmError> {
    let parsed: CompletionResponse = serde_json::from_str(body)?;

    if let Some(usage) = &parsed.usage {
        debug!(
            "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    let message = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .ok_or(LlmError::MissingMessage)?;

    match message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(LlmError::EmptyContent),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
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
                .map(|s| s.trim())
                .unwrap_or(stripped)
        }
        None => text,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::test_support::{completion, test_client};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_backoff_doubles_and_saturates() {
        let settings = LlmSettings {
            api_url: String::new(),
            api_key: String::new(),
            model: String::new(),
            timeout: Duration::from_secs(1),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(100),
        };
        assert_eq!(settings.backoff(1), Duration::from_millis(100));
        assert_eq!(settings.backoff(3), Duration::from_millis(400));
        assert_eq!(settings.backoff(40), Duration::from_millis(100) * u32::MAX);

        let huge = LlmSettings {
            retry_base_delay: Duration::MAX,
            ..settings
        };
        assert_eq!(huge.backoff(2), Duration::MAX);
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_completion_missing_choices() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, LlmError::MissingMessage));
    }

    #[test]
    fn test_parse_completion_null_message() {
        let err = parse_completion(r#"{"choices": [{"message": null}]}"#).unwrap_err();
        assert!(matches!(err, LlmError::MissingMessage));
    }

    #[test]
    fn test_parse_completion_malformed_body() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, LlmError::Decode(_)));
    }

    #[tokio::test]
    async fn test_call_sends_bearer_token_and_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hello rider")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, 0);
        let text = client.call(&[ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(text, "Hello rider");
    }

    #[tokio::test]
    async fn test_call_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("recovered")))
            .mount(&server)
            .await;

        let client = test_client(&server, 2);
        let text = client.call(&[ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(text, "recovered");
    }

    #[tokio::test]
    async fn test_call_does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "error": { "message": "bad model" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, 3);
        let err = client.call(&[ChatMessage::user("hi")]).await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad model");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_surfaces_last_error_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(3)
            .mount(&server)
            .await;

        let client = test_client(&server, 2);
        let err = client.call(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 429, .. }));
    }
}
