use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use std::time::Duration;

use crate::translation::retry::RetryPolicy;

/// Application configuration module
/// This module handles loading, validating and saving configuration
/// settings. Defaults mirror the service's production values.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Batching and concurrency settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Retry settings for transient provider failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Completion provider configuration (OpenAI chat-completions)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; `OPENAI_API_KEY` overrides it
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// What to do with a batch whose transient retries are exhausted
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Pass the batch's original texts through and keep going
    #[default]
    Fallback,
    /// Fail the whole call with the provider error
    Abort,
}

impl std::str::FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "abort" => Ok(Self::Abort),
            _ => Err(anyhow!("Invalid failure policy: {}", s)),
        }
    }
}

/// Batching and concurrency settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Segments per provider request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Trailing segments of the previous window used as context
    #[serde(default = "default_context_size")]
    pub context_size: usize,

    /// Batches translated concurrently per window
    #[serde(default = "default_concurrent_batches")]
    pub concurrent_batches: usize,

    /// Handling of batches that exhaust their retries
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            context_size: default_context_size(),
            concurrent_batches: default_concurrent_batches(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Retry settings for transient provider failures
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Exponential backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub multiplier: f64,

    /// Backoff floor in milliseconds
    #[serde(default = "default_min_backoff_ms")]
    pub min_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            multiplier: default_backoff_multiplier(),
            min_backoff_ms: default_min_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryConfig {
    /// Build the retry policy used around provider calls
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
            .with_multiplier(self.multiplier)
            .with_backoff_bounds(
                Duration::from_millis(self.min_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            )
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Corresponding `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ko".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.3
}

fn default_batch_size() -> usize {
    10
}

fn default_context_size() -> usize {
    2
}

fn default_concurrent_batches() -> usize {
    3
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_min_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

/// Environment variable holding the provider API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the model name
pub const MODEL_ENV: &str = "OPENAI_MODEL";

impl Config {
    /// Load a configuration file, falling back to defaults when it is absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Apply `OPENAI_API_KEY` / `OPENAI_MODEL` when they are set
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::var(API_KEY_ENV).ok(), std::env::var(MODEL_ENV).ok());
    }

    /// Apply explicit key/model overrides, ignoring empty values
    pub fn apply_overrides(&mut self, api_key: Option<String>, model: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = key;
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.provider.model = model;
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.pipeline.batch_size == 0 {
            return Err(anyhow!("pipeline.batch_size must be at least 1"));
        }
        if self.pipeline.concurrent_batches == 0 {
            return Err(anyhow!("pipeline.concurrent_batches must be at least 1"));
        }
        if self.retry.max_attempts == 0 {
            return Err(anyhow!("retry.max_attempts must be at least 1"));
        }
        if self.retry.min_backoff_ms > self.retry.max_backoff_ms {
            return Err(anyhow!(
                "retry.min_backoff_ms ({}) exceeds retry.max_backoff_ms ({})",
                self.retry.min_backoff_ms,
                self.retry.max_backoff_ms
            ));
        }
        if self.provider.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Provider API key is required (set provider.api_key or {})",
                API_KEY_ENV
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            provider: ProviderConfig::default(),
            pipeline: PipelineConfig::default(),
            retry: RetryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
