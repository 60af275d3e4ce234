use async_trait::async_trait;

use crate::domain::{CompletionOptions, CompletionResult, DomainError, Message};

/// An interface for sending a conversation to a chat-completion endpoint and
/// receiving the assistant's reply.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. Use cases hold an `Arc<dyn ChatClient>` and stay decoupled from
/// any particular HTTP client library.
///
/// Implementations must reject an empty model, an empty conversation, or a
/// message with empty content with [`DomainError::InvalidInput`] before
/// touching the network.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `messages` to `model` with the given sampling options and return
    /// the content of the first choice.
    async fn complete_with_options(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResult, DomainError>;

    /// Send `messages` to `model`, leaving sampling to the server's defaults.
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<CompletionResult, DomainError> {
        self.complete_with_options(model, messages, &CompletionOptions::default())
            .await
    }

    /// Short name for logging.
    fn name(&self) -> &str;
}
