use serde::{Deserialize, Serialize};

use super::Message;
use crate::domain::DomainError;

/// The assistant's reply: the first choice's message content, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    text: String,
}

impl CompletionResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Optional sampling parameters. Unset fields are left to the server's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.max_tokens.is_none() && self.temperature.is_none()
    }
}

/// Checks the preconditions every chat client enforces before going to the
/// network: a non-empty model and a non-empty conversation without blank turns.
pub fn validate_request(model: &str, messages: &[Message]) -> Result<(), DomainError> {
    if model.trim().is_empty() {
        return Err(DomainError::invalid_input("model name must not be empty"));
    }
    if messages.is_empty() {
        return Err(DomainError::invalid_input(
            "conversation must contain at least one message",
        ));
    }
    if let Some(idx) = messages.iter().position(|m| m.content.is_empty()) {
        return Err(DomainError::invalid_input(format!(
            "message {idx} ({}) has empty content",
            messages[idx].role
        )));
    }
    Ok(())
}
