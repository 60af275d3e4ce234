use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ChatClient;
use crate::domain::{
    validate_request, CompletionOptions, CompletionResult, DomainError, Message,
};

/// A call captured by [`MockChatClient`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: CompletionOptions,
}

/// In-process [`ChatClient`] that never touches the network.
///
/// Scripted replies are returned in order; once they run out the client
/// echoes the last message back. Every call is recorded.
pub struct MockChatClient {
    script: Mutex<VecDeque<Result<String, DomainError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::with_replies(std::iter::empty())
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Result<String, DomainError>>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete_with_options(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResult, DomainError> {
        validate_request(model, messages)?;

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                model: model.to_string(),
                messages: messages.to_vec(),
                options: *options,
            });

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match scripted {
            Some(reply) => reply.map(CompletionResult::new),
            None => {
                let last = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
                Ok(CompletionResult::new(format!("echo: {last}")))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_last_message_when_unscripted() {
        let client = MockChatClient::new();
        let reply = client
            .complete("ai/smollm2", &[Message::user("ping")])
            .await
            .unwrap();
        assert_eq!(reply.text(), "echo: ping");
    }

    #[tokio::test]
    async fn validates_like_a_real_client() {
        let client = MockChatClient::new();
        let err = client.complete("", &[Message::user("ping")]).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn scripted_replies_are_consumed_in_order() {
        let client = MockChatClient::with_replies([
            Ok("one".to_string()),
            Err(DomainError::malformed("no choices")),
        ]);
        let msgs = [Message::user("q")];

        assert_eq!(client.complete("m", &msgs).await.unwrap().text(), "one");
        assert!(client.complete("m", &msgs).await.unwrap_err().is_malformed_response());
        assert_eq!(client.complete("m", &msgs).await.unwrap().text(), "echo: q");
        assert_eq!(client.calls().len(), 3);
    }
}
