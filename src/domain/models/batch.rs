use serde::{Deserialize, Serialize};

use super::{CompletionResult, Message};
use crate::domain::DomainError;

/// One entry of a batch file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub id: String,
    pub messages: Vec<Message>,
    /// Overrides the configured default when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl BatchRequest {
    pub fn new(id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            id: id.into(),
            messages,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug)]
pub struct BatchOutcome {
    id: String,
    result: Result<CompletionResult, DomainError>,
}

impl BatchOutcome {
    pub fn new(id: impl Into<String>, result: Result<CompletionResult, DomainError>) -> Self {
        Self {
            id: id.into(),
            result,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The reply text, or `Error: ...` for a failed request.
    pub fn response_text(&self) -> String {
        match &self.result {
            Ok(reply) => reply.text().to_string(),
            Err(e) => format!("Error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_file_entry_without_max_tokens_parses() {
        let json = r#"{"id":"req_001","messages":[{"role":"user","content":"What is the capital of France?"}]}"#;
        let req: BatchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, "req_001");
        assert_eq!(req.max_tokens, None);
        assert_eq!(req.messages.len(), 1);
    }

    #[test]
    fn failed_outcome_renders_error_prefix() {
        let outcome = BatchOutcome::new("req_002", Err(DomainError::upstream(500, "")));
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.response_text(),
            "Error: Upstream error: endpoint returned HTTP 500"
        );
    }
}
