//! Plain-text rendering for the CLI. Everything takes a writer so the
//! exact bytes printed to stdout can be asserted in tests.

use std::io::{self, Write};

use crate::domain::{BatchOutcome, CompletionOptions, CompletionResult, DomainError, ModelConfig};

/// Print the reply text exactly as received, followed by a newline.
pub fn write_reply<W: Write>(out: &mut W, reply: &CompletionResult) -> io::Result<()> {
    writeln!(out, "{}", reply.text())
}

pub fn write_generation_summary<W: Write>(
    out: &mut W,
    model: &str,
    options: &CompletionOptions,
) -> io::Result<()> {
    writeln!(
        out,
        "Model: {model}, Temperature: {}, Max Tokens: {}",
        display_or_default(options.temperature),
        display_or_default(options.max_tokens)
    )
}

pub fn write_batch_report<W: Write>(out: &mut W, outcomes: &[BatchOutcome]) -> io::Result<()> {
    for outcome in outcomes {
        writeln!(out, "Request ID: {}", outcome.id())?;
        writeln!(out, "Response: {}", outcome.response_text())?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_config<W: Write>(out: &mut W, config: &ModelConfig) -> io::Result<()> {
    writeln!(out, "Base URL:    {}", config.base_url())?;
    writeln!(out, "API Key:     {}", config.masked_api_key())?;
    writeln!(out, "Model:       {}", config.model_name())?;
    writeln!(out, "Max Tokens:  {}", display_setting(config.max_tokens()))?;
    writeln!(out, "Temperature: {}", display_setting(config.temperature()))?;
    writeln!(out, "Timeout:     {}s", config.timeout().as_secs())
}

fn display_or_default<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "(server default)".to_string(), |v| v.to_string())
}

fn display_setting<T: std::fmt::Display>(value: Result<T, DomainError>) -> String {
    match value {
        Ok(v) => v.to_string(),
        Err(_) => "(invalid)".to_string(),
    }
}

/// Extra advice to log after a failed call, if any applies.
pub fn failure_hint(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::Network(_)) => {
            Some("Please ensure the local model server is running and reachable.")
        }
        Some(DomainError::Upstream { status: 404, .. }) => {
            Some("Please ensure the model is available on the server.")
        }
        _ => None,
    }
}
