/*!
 * Error types for the subline pipeline.
 *
 * Provider failures are split into transient and permanent variants so the
 * retry policy can decide what is worth another attempt. Everything the
 * pipeline absorbs as fallback never leaves the translation module.
 */

use thiserror::Error;

/// Errors that can occur when talking to a completion provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The request could not be built or sent for a non-network reason
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// The provider answered but the body could not be decoded
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection, including timeouts
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether the failure is worth retrying.
    ///
    /// Only connection failures and rate limiting qualify; everything else
    /// is deterministic on the provider side.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::ConnectionError(_) | ProviderError::RateLimitExceeded(_)
        )
    }
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Invalid pipeline settings or missing provider credentials
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider failure that could not be absorbed as fallback
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Provider reply was not the expected structured output
    #[error("Failed to parse translation reply: {0}")]
    Parse(String),

    /// A request segment violates the data model
    #[error("Invalid segment at index {index}: {message}")]
    Validation {
        /// Position of the offending segment in the request
        index: usize,
        /// What is wrong with it
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error loading or validating configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        Self::Translation(TranslationError::Provider(error))
    }
}
