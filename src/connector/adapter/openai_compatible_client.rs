use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{
    validate_request, CompletionOptions, CompletionResult, DomainError, Message, ModelConfig,
};

const COMPLETIONS_PATH: &str = "/chat/completions";
/// Upstream error bodies are cut to this many characters in log lines.
const MAX_LOGGED_BODY_CHARS: usize = 512;

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Minimal subset of the chat-completion response we care about. Every
/// level is optional so a missing field surfaces as a malformed response
/// rather than an opaque deserialization error.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Option<Vec<ApiChoice>>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: Option<ApiChoiceMessage>,
}

#[derive(Deserialize)]
struct ApiChoiceMessage {
    content: Option<String>,
}

/// HTTP client for OpenAI-compatible `/chat/completions` endpoints such as
/// Docker Model Runner, llama.cpp server, or LM Studio.
///
/// Implements [`ChatClient`]. Each call is a single POST with no retries.
/// Connection failures and timeouts map to [`DomainError::Network`],
/// non-2xx statuses to [`DomainError::Upstream`], and responses without
/// `choices[0].message.content` to [`DomainError::MalformedResponse`].
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    api_key: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenAiCompatibleClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{COMPLETIONS_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            url,
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.api_key(), config.base_url(), config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn extract_reply(body: &str) -> Result<CompletionResult, DomainError> {
        let response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| DomainError::malformed(format!("response is not valid JSON: {e}")))?;

        let choices = response
            .choices
            .ok_or_else(|| DomainError::malformed("response has no `choices` list"))?;
        let first = choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::malformed("response `choices` list is empty"))?;

        first
            .message
            .and_then(|m| m.content)
            .map(CompletionResult::new)
            .ok_or_else(|| DomainError::malformed("first choice has no message content"))
    }
}

#[async_trait]
impl ChatClient for OpenAiCompatibleClient {
    async fn complete_with_options(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResult, DomainError> {
        validate_request(model, messages)?;

        let request = ApiRequest {
            model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        debug!("POST {} (model: {model}, {} messages)", self.url, messages.len());

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::network(format!("request to {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Chat endpoint returned {status}: {}",
                truncate_for_log(&body, MAX_LOGGED_BODY_CHARS)
            );
            return Err(DomainError::upstream(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::network(format!("failed to read response body: {e}")))?;

        Self::extract_reply(&body)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

fn truncate_for_log(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path_without_double_slash() {
        let client = OpenAiCompatibleClient::new(
            "k",
            "http://localhost:8080/v1/",
            Duration::from_secs(1),
        );
        assert_eq!(client.url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn extract_reply_returns_first_choice_verbatim() {
        let body = r#"{"id":"x","choices":[
            {"index":0,"message":{"role":"assistant","content":"  first\n"}},
            {"index":1,"message":{"role":"assistant","content":"second"}}
        ],"usage":{"total_tokens":3}}"#;
        let reply = OpenAiCompatibleClient::extract_reply(body).unwrap();
        assert_eq!(reply.text(), "  first\n");
    }

    #[test]
    fn extract_reply_rejects_missing_choices() {
        let err = OpenAiCompatibleClient::extract_reply(r#"{"id":"x"}"#).unwrap_err();
        assert!(err.is_malformed_response());
    }

    #[test]
    fn extract_reply_rejects_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let err = OpenAiCompatibleClient::extract_reply(body).unwrap_err();
        assert!(err.is_malformed_response());
    }

    #[test]
    fn logged_body_is_cut_on_a_char_boundary() {
        let body = "é".repeat(600);
        let logged = truncate_for_log(&body, MAX_LOGGED_BODY_CHARS);
        assert_eq!(logged.chars().count(), 512);
        assert_eq!(truncate_for_log("short", MAX_LOGGED_BODY_CHARS), "short");
    }

    #[test]
    fn extract_reply_rejects_non_json() {
        let err = OpenAiCompatibleClient::extract_reply("<html>502</html>").unwrap_err();
        assert!(err.is_malformed_response());
    }

    #[test]
    fn request_omits_unset_options() {
        let messages = [Message::user("hi")];
        let request = ApiRequest {
            model: "ai/smollm2",
            messages: &messages,
            max_tokens: None,
            temperature: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "model": "ai/smollm2",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_sending() {
        // Port 9 (discard) is never contacted because validation fails first.
        let client =
            OpenAiCompatibleClient::new("k", "http://127.0.0.1:9/v1", Duration::from_secs(1));
        let err = client.complete("ai/smollm2", &[]).await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
