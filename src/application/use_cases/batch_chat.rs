use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ChatClient;
use crate::domain::{BatchOutcome, BatchRequest, CompletionOptions, DomainError, ModelConfig};

/// Runs a list of independent conversations one after another.
///
/// A failing request is recorded in its [`BatchOutcome`] and does not stop
/// the batch. Outcomes are returned in request order.
pub struct BatchChatUseCase {
    client: Arc<dyn ChatClient>,
    model: String,
    default_max_tokens: u32,
}

impl BatchChatUseCase {
    /// Fails when the configured default max tokens is not usable.
    pub fn new(client: Arc<dyn ChatClient>, config: &ModelConfig) -> Result<Self, DomainError> {
        Ok(Self {
            client,
            model: config.model_name().to_string(),
            default_max_tokens: config.max_tokens()?,
        })
    }

    pub async fn execute(&self, requests: &[BatchRequest]) -> Vec<BatchOutcome> {
        let total = requests.len();
        info!("Starting batch processing for {total} requests");

        let mut outcomes = Vec::with_capacity(total);
        for (i, request) in requests.iter().enumerate() {
            info!(
                "Processing request {}/{} (ID: {})...",
                i + 1,
                total,
                request.id
            );

            let options = CompletionOptions::new()
                .with_max_tokens(request.max_tokens.unwrap_or(self.default_max_tokens));
            let result = self
                .client
                .complete_with_options(&self.model, &request.messages, &options)
                .await;

            if let Err(e) = &result {
                warn!("Error processing request {}: {e}", request.id);
            }
            outcomes.push(BatchOutcome::new(request.id.clone(), result));
        }

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!("Batch processing complete ({failed} failed)");
        outcomes
    }
}
