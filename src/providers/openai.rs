use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::app_config::ProviderConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{CompletionRequest, Provider, ResponseFormat};

/// OpenAI client for the chat-completions API
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Fully resolved chat-completions URL
    completions_url: String,
    /// Model used for every request
    model: String,
    /// Sampling temperature
    temperature: f32,
}

/// OpenAI chat-completions request
#[derive(Debug, Serialize, Default)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,

    /// Reply format constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAIResponseFormat>,
}

/// Reply format constraint, e.g. `{"type": "json_object"}`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

/// OpenAI message format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A single completion choice
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIReplyMessage,
}

/// Assistant message inside a choice; content is null for refusals
#[derive(Debug, Deserialize)]
pub struct OpenAIReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// OpenAI chat-completions response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

impl OpenAIRequest {
    /// Create a new OpenAI request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of generated tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Ask for a single JSON object as reply
    pub fn json_object(mut self) -> Self {
        self.response_format = Some(OpenAIResponseFormat {
            format_type: "json_object".to_string(),
        });
        self
    }
}

impl OpenAI {
    /// Create a new OpenAI client
    ///
    /// Fails with a configuration error when the key is empty or the
    /// endpoint is not a valid URL.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, TranslationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TranslationError::Configuration(
                "OpenAI API key not configured".to_string(),
            ));
        }

        let endpoint = endpoint.into();
        let base = Url::parse(endpoint.trim_end_matches('/')).map_err(|e| {
            TranslationError::Configuration(format!("Invalid OpenAI endpoint '{}': {}", endpoint, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|e| TranslationError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            completions_url: format!("{}/chat/completions", base.as_str().trim_end_matches('/')),
            model: model.into(),
            temperature: 0.3,
        })
    }

    /// Create a client from the provider section of the configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self, TranslationError> {
        Ok(Self::new(
            config.api_key.clone(),
            config.endpoint.clone(),
            config.model.clone(),
            config.timeout_secs,
        )?
        .with_temperature(config.temperature))
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model name used for requests
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a raw chat-completions request
    pub async fn send(&self, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(classify_status(status, error_text));
        }

        let body = response.text().await.map_err(classify_send_error)?;
        serde_json::from_str::<OpenAIResponse>(&body)
            .map_err(|e| ProviderError::ParseError(format!("OpenAI response body: {}", e)))
    }

    /// Map a completion request onto the chat-completions wire format
    pub fn build_request(&self, request: CompletionRequest) -> OpenAIRequest {
        let api_request = OpenAIRequest::new(&self.model)
            .add_message("system", request.system_prompt)
            .add_message("user", request.user_prompt)
            .temperature(self.temperature);

        match request.response_format {
            ResponseFormat::Json => api_request.json_object(),
            ResponseFormat::Text => api_request,
        }
    }

    /// Extract text from an OpenAI response
    pub fn extract_text(response: &OpenAIResponse) -> Option<String> {
        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
    }
}

/// Map a transport failure onto the provider taxonomy
fn classify_send_error(error: reqwest::Error) -> ProviderError {
    if error.is_builder() {
        ProviderError::RequestFailed(error.to_string())
    } else {
        ProviderError::ConnectionError(error.to_string())
    }
}

/// Map a non-success HTTP status onto the provider taxonomy
pub fn classify_status(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthenticationError(message)
        }
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl Provider for OpenAI {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let response = self.send(&self.build_request(request)).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "OpenAI usage: {} prompt + {} completion = {} tokens",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Self::extract_text(&response)
            .ok_or_else(|| ProviderError::ParseError("OpenAI response contained no content".to_string()))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = self
            .build_request(CompletionRequest::text("Reply with OK.", "Hello"))
            .max_tokens(5);
        self.send(&request).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "openai"
    }
}
