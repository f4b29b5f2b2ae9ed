/*!
 * Provider implementations for text completion services.
 *
 * The pipeline consumes a provider as an opaque call: given a rendered
 * system and user prompt, return text or fail. Implementations must map
 * their failures onto `ProviderError` so that transient and permanent
 * errors stay distinguishable for the retry policy.
 *
 * - `openai`: OpenAI chat-completions API client
 * - `mock`: scripted provider for tests and benchmarks
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Shape the caller expects the completion to have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Free-form text
    Text,
    /// A single JSON object
    #[default]
    Json,
}

/// A fully rendered completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Instruction for the model
    pub system_prompt: String,
    /// The content to act on
    pub user_prompt: String,
    /// Expected reply shape
    pub response_format: ResponseFormat,
}

impl CompletionRequest {
    /// Create a request expecting a JSON object reply
    pub fn json(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            response_format: ResponseFormat::Json,
        }
    }

    /// Create a request expecting free-form text
    pub fn text(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            response_format: ResponseFormat::Text,
        }
    }
}

/// Common trait for all completion providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The rendered prompts and expected reply shape
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The reply text or a classified error
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}

pub mod mock;
pub mod openai;
