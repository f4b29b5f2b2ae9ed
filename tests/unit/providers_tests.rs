/*!
 * Tests for provider implementations
 */

use reqwest::StatusCode;
use subline::app_config::ProviderConfig;
use subline::errors::{ProviderError, TranslationError};
use subline::providers::mock::{MOCK_PREFIX, MockProvider, prompt_entries};
use subline::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse, classify_status};
use subline::providers::{CompletionRequest, Provider, ResponseFormat};
use subline::segments::Segment;
use subline::translation::{TranslationContext, render_user_prompt};

#[test]
fn test_openai_from_config_withoutKey_shouldBeConfigurationError() {
    let config = ProviderConfig::default();
    assert!(matches!(
        OpenAI::from_config(&config),
        Err(TranslationError::Configuration(_))
    ));
}

#[test]
fn test_openai_from_config_withKey_shouldUseModel() {
    let config = ProviderConfig {
        api_key: "sk-test".to_string(),
        model: "gpt-4o".to_string(),
        ..Default::default()
    };
    let client = OpenAI::from_config(&config).unwrap();
    assert_eq!(client.model(), "gpt-4o");
    assert_eq!(client.name(), "openai");
}

#[test]
fn test_openai_request_withoutJsonObject_shouldOmitOptionalFields() {
    let request = OpenAIRequest::new("gpt-4o-mini").add_message("user", "Hi");
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["model"], "gpt-4o-mini");
    assert_eq!(value["messages"][0]["role"], "user");
    assert!(value.get("temperature").is_none());
    assert!(value.get("response_format").is_none());
}

#[test]
fn test_openai_response_withUsage_shouldExtractFirstChoice() {
    let body = r#"{
        "choices": [{"message": {"role": "assistant", "content": "{\"translations\": []}"}}],
        "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
    }"#;
    let response: OpenAIResponse = serde_json::from_str(body).unwrap();

    assert_eq!(response.usage.as_ref().unwrap().total_tokens, 15);
    assert_eq!(
        OpenAI::extract_text(&response).as_deref(),
        Some("{\"translations\": []}")
    );
}

#[test]
fn test_openai_response_withNoChoices_shouldExtractNothing() {
    let response: OpenAIResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
    assert!(OpenAI::extract_text(&response).is_none());
}

#[test]
fn test_classify_status_withForbidden_shouldBeAuthentication() {
    assert!(matches!(
        classify_status(StatusCode::FORBIDDEN, "denied".into()),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        classify_status(StatusCode::SERVICE_UNAVAILABLE, "busy".into()),
        ProviderError::ApiError { status_code: 503, .. }
    ));
}

#[tokio::test]
async fn test_openai_complete_withUnreachableEndpoint_shouldBeTransient() {
    let client = OpenAI::new("sk-test", "http://127.0.0.1:1/v1", "gpt-4o-mini", 2).unwrap();
    let error = client
        .complete(CompletionRequest::json("sys", "user"))
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::ConnectionError(_)));
    assert!(error.is_transient());
}

#[test]
fn test_completion_request_constructors_shouldSetFormat() {
    assert_eq!(CompletionRequest::json("s", "u").response_format, ResponseFormat::Json);
    assert_eq!(CompletionRequest::text("s", "u").response_format, ResponseFormat::Text);
}

#[test]
fn test_prompt_entries_withRenderedPrompt_shouldRecoverIdsAndTexts() {
    let batch = vec![
        Segment::new(0.0, 1.0, "Hello"),
        Segment::new(1.0, 2.0, "[music] \"quoted\""),
    ];
    let context = TranslationContext::from_batch(&[Segment::new(0.0, 0.5, "Before")], 2);
    let prompt = render_user_prompt(&batch, &context);

    assert_eq!(
        prompt_entries(&prompt),
        vec![(0, "Hello".to_string()), (1, "[music] \"quoted\"".to_string())]
    );
}

#[tokio::test]
async fn test_mock_reversed_shouldKeepIds() {
    let provider = MockProvider::reversed();
    let prompt = render_user_prompt(
        &[Segment::new(0.0, 1.0, "a"), Segment::new(1.0, 2.0, "b")],
        &TranslationContext::empty(),
    );
    let reply = provider.complete(CompletionRequest::json("sys", prompt)).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&reply).unwrap();

    assert_eq!(value["translations"][0]["id"], 1);
    assert_eq!(value["translations"][0]["text"], format!("{}b", MOCK_PREFIX));
}

#[test]
fn test_mock_permanent_shouldFailConnectionTest() {
    assert!(tokio_test::block_on(MockProvider::permanent().test_connection()).is_err());
    assert!(tokio_test::block_on(MockProvider::working().test_connection()).is_ok());
}
