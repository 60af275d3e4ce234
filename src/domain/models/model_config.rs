use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use super::CompletionOptions;
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";
pub const DEFAULT_API_KEY: &str = "dummy-key";
pub const DEFAULT_MODEL: &str = "ai/smollm2";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const BASE_URL_VAR: &str = "LOCAL_MODEL_BASE_URL";
pub const API_KEY_VAR: &str = "LOCAL_API_KEY";
pub const MODEL_VAR: &str = "LOCAL_MODEL_NAME";
pub const MAX_TOKENS_VAR: &str = "DEFAULT_MAX_TOKENS";
pub const TEMPERATURE_VAR: &str = "DEFAULT_TEMPERATURE";
pub const TIMEOUT_VAR: &str = "LOCALCHAT_TIMEOUT_SECS";

/// Connection and generation settings for the local model server.
///
/// Built once at startup and handed to clients and use cases by reference;
/// nothing reads the process environment after construction.
///
/// | Variable                 | Default                    |
/// |--------------------------|----------------------------|
/// | `LOCAL_MODEL_BASE_URL`   | `http://localhost:8080/v1` |
/// | `LOCAL_API_KEY`          | `dummy-key`                |
/// | `LOCAL_MODEL_NAME`       | `ai/smollm2`               |
/// | `DEFAULT_MAX_TOKENS`     | `150`                      |
/// | `DEFAULT_TEMPERATURE`    | `0.7`                      |
/// | `LOCALCHAT_TIMEOUT_SECS` | `60`                       |
///
/// The generation variables are kept as raw text and only parsed by
/// [`ModelConfig::max_tokens`], [`ModelConfig::temperature`] and
/// [`ModelConfig::generation_options`], so a bad value only affects the
/// commands that actually send it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    base_url: String,
    api_key: String,
    model_name: String,
    timeout: Duration,
    max_tokens: Option<String>,
    temperature: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_API_KEY, DEFAULT_MODEL)
    }
}

impl ModelConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model_name: model_name.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens.to_string());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the configuration from the process environment, falling back to
    /// values in a `.env` file when one exists at `dotenv_path`.
    pub fn from_env_and_dotenv(dotenv_path: &Path) -> Result<Self, DomainError> {
        Self::from_sources(|key| std::env::var(key).ok(), Some(dotenv_path))
    }

    /// Layer `env` over the contents of an optional `.env` file. Variables
    /// present in `env` always win. A missing file is not an error.
    pub fn from_sources<F>(env: F, dotenv_path: Option<&Path>) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_values = match dotenv_path {
            Some(path) if path.exists() => read_dotenv(path)?,
            _ => HashMap::new(),
        };
        Self::from_lookup(|key| env(key).or_else(|| file_values.get(key).cloned()))
    }

    /// Build a configuration from an arbitrary variable lookup. Unset
    /// variables take their literal defaults. Only the transport timeout is
    /// parsed here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = lookup(API_KEY_VAR).unwrap_or_else(|| DEFAULT_API_KEY.to_string());
        let model_name = lookup(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs =
            parse_var(TIMEOUT_VAR, lookup(TIMEOUT_VAR).as_deref(), DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            base_url,
            api_key,
            model_name,
            timeout: Duration::from_secs(timeout_secs),
            max_tokens: lookup(MAX_TOKENS_VAR),
            temperature: lookup(TEMPERATURE_VAR),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_tokens(&self) -> Result<u32, DomainError> {
        let max_tokens =
            parse_var(MAX_TOKENS_VAR, self.max_tokens.as_deref(), DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err(DomainError::config("max_tokens must be greater than zero"));
        }
        Ok(max_tokens)
    }

    pub fn temperature(&self) -> Result<f32, DomainError> {
        let temperature =
            parse_var(TEMPERATURE_VAR, self.temperature.as_deref(), DEFAULT_TEMPERATURE)?;
        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            return Err(DomainError::config(format!(
                "temperature must be between 0.0 and 2.0, got {temperature}"
            )));
        }
        Ok(temperature)
    }

    /// The API key with everything past the first four characters hidden.
    pub fn masked_api_key(&self) -> String {
        if self.api_key.is_empty() {
            return "(none)".to_string();
        }
        let visible: String = self.api_key.chars().take(4).collect();
        format!("{visible}****")
    }

    /// Sampling parameters derived from this configuration.
    pub fn generation_options(&self) -> Result<CompletionOptions, DomainError> {
        Ok(CompletionOptions::new()
            .with_max_tokens(self.max_tokens()?)
            .with_temperature(self.temperature()?))
    }

    /// Check the connection settings. Does not contact the server and does
    /// not look at the generation variables.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.base_url.starts_with("http") {
            return Err(DomainError::config(format!(
                "base_url must be a valid URL, got {:?}",
                self.base_url
            )));
        }
        if self.model_name.trim().is_empty() {
            return Err(DomainError::config("model name must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(DomainError::config("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Check the generation variables used by `advanced` and `batch`.
    pub fn validate_generation(&self) -> Result<(), DomainError> {
        self.generation_options().map(|_| ())
    }
}

fn parse_var<T>(key: &str, raw: Option<&str>, default: T) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DomainError::config(format!("{key}={raw:?} is not valid: {e}"))),
    }
}

fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, DomainError> {
    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| DomainError::config(format!("failed to open {}: {e}", path.display())))?;
    iter.map(|item| {
        item.map_err(|e| DomainError::config(format!("failed to parse {}: {e}", path.display())))
    })
    .collect()
}
