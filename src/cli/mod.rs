use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::domain::BatchRequest;

pub mod output;

pub const DEFAULT_PROMPT: &str = "Hello! How are you?";
pub const ADVANCED_PROMPT: &str = "What are the benefits of using a config class?";

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Send one prompt and print the reply
    Chat {
        #[arg(default_value = DEFAULT_PROMPT)]
        prompt: String,

        /// Optional system message sent before the prompt
        #[arg(short, long)]
        system: Option<String>,
    },

    /// Send one prompt with the configured temperature and max tokens
    Advanced {
        #[arg(default_value = ADVANCED_PROMPT)]
        prompt: String,
    },

    /// Process a JSON array of requests sequentially
    Batch {
        /// File containing `[{"id": ..., "messages": [...], "max_tokens": ...}]`
        file: PathBuf,
    },

    /// Print the effective configuration and validate it
    Config,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Chat {
            prompt: DEFAULT_PROMPT.to_string(),
            system: None,
        }
    }
}

pub fn load_batch_file(path: &Path) -> Result<Vec<BatchRequest>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read batch file {}", path.display()))?;
    let requests = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse batch file {}", path.display()))?;
    Ok(requests)
}
