/*!
 * Tests for error types and conversions
 */

use subline::errors::{AppError, ProviderError, TranslationError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection timeout".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection timeout"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "Internal error".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("Internal error"));
}

#[test]
fn test_providerError_isTransient_shouldOnlyAcceptConnectionAndRateLimit() {
    assert!(ProviderError::ConnectionError("reset".into()).is_transient());
    assert!(ProviderError::RateLimitExceeded("429".into()).is_transient());

    assert!(!ProviderError::AuthenticationError("401".into()).is_transient());
    assert!(!ProviderError::ParseError("bad".into()).is_transient());
    assert!(!ProviderError::RequestFailed("bad".into()).is_transient());
    assert!(
        !ProviderError::ApiError {
            status_code: 503,
            message: "unavailable".into()
        }
        .is_transient()
    );
}

#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::RateLimitExceeded("slow down".into()).into();
    assert!(matches!(error, TranslationError::Provider(_)));
    assert!(error.to_string().contains("slow down"));
}

#[test]
fn test_translationError_validation_shouldNameIndex() {
    let error = TranslationError::Validation {
        index: 4,
        message: "end before start".to_string(),
    };
    assert_eq!(error.to_string(), "Invalid segment at index 4: end before start");
}

#[test]
fn test_appError_conversions_shouldPickVariant() {
    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_provider: AppError = ProviderError::ConnectionError("down".into()).into();
    assert!(matches!(from_provider, AppError::Translation(TranslationError::Provider(_))));

    let from_anyhow: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(from_anyhow, AppError::Unknown(_)));
}
