/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::sync::Arc;
use tempfile::tempdir;

use subline::app_config::{Config, FailurePolicy};
use subline::app_controller::Controller;
use subline::errors::TranslationError;
use subline::providers::mock::MockProvider;
use subline::segments::{Segment, TranslateRequest, TranslateResponse};

use crate::common::{init_logging, make_segments};

fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.api_key = "sk-test".to_string();
    config.retry.min_backoff_ms = 1;
    config.retry.max_backoff_ms = 2;
    config
}

/// Test the controller with a configured OpenAI provider
#[test]
fn test_controller_with_config_withApiKey_shouldInitializeWithoutErrors() -> Result<()> {
    let mut config = test_config();
    config.source_language = "ko".to_string();
    config.target_language = "en".to_string();

    let controller = Controller::with_config(config)?;
    assert_eq!(controller.config().source_language, "ko");
    Ok(())
}

#[tokio::test]
async fn test_run_withRequestDocument_shouldWriteResponseFile() -> Result<()> {
    init_logging();
    let dir = tempdir()?;
    let input = dir.path().join("talk.json");
    let output = dir.path().join("talk.translated.json");

    let request = TranslateRequest::new(make_segments(12)).with_languages("en", "ja");
    std::fs::write(&input, serde_json::to_string(&request)?)?;

    let provider = MockProvider::working();
    let controller = Controller::with_provider(test_config(), Arc::new(provider.clone()))?;
    let response = controller.run(&input, &output, None, None).await?;

    assert!(response.success);
    assert_eq!(response.meta.translated_count, 12);
    assert_eq!(provider.call_count(), 2);
    assert!(provider.requests()[0].system_prompt.contains("Japanese"));

    let written: TranslateResponse = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(written.data.segments.len(), 12);
    assert_eq!(written.data.segments[3].original_text, "segment number 3");
    assert_eq!(
        written.data.segments[3].translated_text,
        MockProvider::translate("segment number 3")
    );
    Ok(())
}

#[tokio::test]
async fn test_run_withBareSegmentList_shouldUseConfiguredLanguagesAndCamelCase() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("segments.json");
    let output = dir.path().join("out.json");
    std::fs::write(
        &input,
        r#"[{"start": 0.0, "end": 1.5, "text": "Hello"}, {"start": 1.5, "end": 3.0, "text": "Bye"}]"#,
    )?;

    let controller = Controller::with_provider(test_config(), Arc::new(MockProvider::working()))?;
    controller.run(&input, &output, None, None).await?;

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(written["success"], true);
    assert_eq!(written["meta"]["translatedCount"], 2);
    assert!(written["meta"]["processingTime"].is_number());
    assert_eq!(written["data"]["segments"][1]["originalText"], "Bye");
    assert_eq!(written["data"]["segments"][1]["end"], 3.0);
    Ok(())
}

#[tokio::test]
async fn test_run_withLanguageOverride_shouldPickKoreanToEnglishPrompt() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.json");
    std::fs::write(&input, serde_json::to_string(&make_segments(3))?)?;

    let provider = MockProvider::working();
    let controller = Controller::with_provider(test_config(), Arc::new(provider.clone()))?;
    controller.run(&input, &output, Some("ko"), Some("en")).await?;

    assert!(provider.requests()[0].system_prompt.contains("Korean to English"));
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFailWithoutOutput() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.json");
    let controller =
        Controller::with_provider(test_config(), Arc::new(MockProvider::working())).unwrap();

    let result = controller
        .run(&dir.path().join("missing.json"), &output, None, None)
        .await;

    assert!(result.is_err());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_translate_request_withEmptySegments_shouldBeValidationError() {
    let provider = MockProvider::working();
    let controller = Controller::with_provider(test_config(), Arc::new(provider.clone())).unwrap();

    let result = controller.translate_request(&TranslateRequest::new(Vec::new())).await;

    assert!(matches!(result, Err(TranslationError::Validation { .. })));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_translate_request_withProviderDown_shouldPassTextsThrough() {
    let provider = MockProvider::always_transient();
    let controller = Controller::with_provider(test_config(), Arc::new(provider.clone())).unwrap();
    let request = TranslateRequest::new(vec![Segment::new(0.0, 1.0, "Hello")]);

    let response = controller.translate_request(&request).await.unwrap();

    assert_eq!(response.meta.translated_count, 1);
    assert_eq!(response.data.segments[0].translated_text, "Hello");
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn test_translate_request_withAbortPolicy_shouldReturnProviderError() {
    let mut config = test_config();
    config.pipeline.failure_policy = FailurePolicy::Abort;
    let controller =
        Controller::with_provider(config, Arc::new(MockProvider::always_transient())).unwrap();
    let request = TranslateRequest::new(vec![Segment::new(0.0, 1.0, "Hello")]);

    let result = controller.translate_request(&request).await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
}
