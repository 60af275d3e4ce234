use std::sync::Arc;

use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{CompletionOptions, CompletionResult, DomainError, Message, ModelConfig};

/// Sends a single conversation to the configured model.
pub struct ChatUseCase {
    client: Arc<dyn ChatClient>,
    model: String,
    options: CompletionOptions,
}

impl ChatUseCase {
    /// Uses the configured model and leaves sampling to the server.
    pub fn new(client: Arc<dyn ChatClient>, config: &ModelConfig) -> Self {
        Self {
            client,
            model: config.model_name().to_string(),
            options: CompletionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn ask(&self, prompt: &str) -> Result<CompletionResult, DomainError> {
        self.ask_with_system(None, prompt).await
    }

    pub async fn ask_with_system(
        &self,
        system: Option<&str>,
        prompt: &str,
    ) -> Result<CompletionResult, DomainError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(prompt));
        self.execute(&messages).await
    }

    pub async fn execute(&self, messages: &[Message]) -> Result<CompletionResult, DomainError> {
        debug!(
            "Sending {} message(s) to {} via {}",
            messages.len(),
            self.model,
            self.client.name()
        );

        let reply = self
            .client
            .complete_with_options(&self.model, messages, &self.options)
            .await?;

        debug!("Received reply ({} chars)", reply.text().len());
        Ok(reply)
    }
}
