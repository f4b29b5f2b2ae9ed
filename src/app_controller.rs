use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::openai::OpenAI;
use crate::segments::{Segment, TranslateRequest, TranslateResponse};
use crate::translation::TranslationService;

// @module: Application controller wiring config, provider and pipeline

/// Accepted input documents: a full request or a bare segment list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Request(TranslateRequest),
    Segments(Vec<Segment>),
}

/// Main application controller for segment translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation pipeline
    service: TranslationService,
}

impl Controller {
    // @method: Create a controller backed by the configured OpenAI provider
    pub fn with_config(config: Config) -> Result<Self, TranslationError> {
        let provider = OpenAI::from_config(&config.provider)?;
        Self::with_provider(config, Arc::new(provider))
    }

    // @method: Create a controller with an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Result<Self, TranslationError> {
        let service = TranslationService::from_config(provider, &config)?;
        Ok(Self { config, service })
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate a request, translate it and wrap the result
    pub async fn translate_request(
        &self,
        request: &TranslateRequest,
    ) -> Result<TranslateResponse, TranslationError> {
        let start_time = Instant::now();
        request.validate()?;

        info!(
            "Translation request: {} segments, {} -> {}",
            request.segments.len(),
            request.source_language,
            request.target_language
        );

        let (segments, stats) = self
            .service
            .translate_all_with_stats(&request.segments, &request.source_language, &request.target_language)
            .await?;

        let processing_secs = start_time.elapsed().as_secs_f64();
        debug!("{}", stats.summary());
        info!(
            "Translation completed: {} segments in {:.2}s",
            segments.len(),
            processing_secs
        );

        Ok(TranslateResponse::new(segments, processing_secs))
    }

    /// Read a request from `input`, translate it and write the response
    ///
    /// Explicit languages override the ones in the input document. A bare
    /// segment list uses the configured languages.
    pub async fn run(
        &self,
        input: &Path,
        output: &Path,
        source_language: Option<&str>,
        target_language: Option<&str>,
    ) -> Result<TranslateResponse> {
        let request = self.load_request(input, source_language, target_language)?;

        let response = self
            .translate_request(&request)
            .await
            .map_err(|e| anyhow!("Translation failed: {}", e))?;

        let json = serde_json::to_string_pretty(&response).context("Failed to serialize response")?;
        std::fs::write(output, json)
            .with_context(|| format!("Failed to write output file: {}", output.display()))?;

        info!("Success: {}", output.display());
        Ok(response)
    }

    /// Load and normalise the request document
    pub fn load_request(
        &self,
        input: &Path,
        source_language: Option<&str>,
        target_language: Option<&str>,
    ) -> Result<TranslateRequest> {
        let content = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read input file: {}", input.display()))?;
        let document: InputDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse input file: {}", input.display()))?;

        let mut request = match document {
            InputDocument::Request(request) => request,
            InputDocument::Segments(segments) => TranslateRequest::new(segments).with_languages(
                self.config.source_language.clone(),
                self.config.target_language.clone(),
            ),
        };

        if let Some(source) = source_language {
            request.source_language = source.to_string();
        }
        if let Some(target) = target_language {
            request.target_language = target.to_string();
        }

        Ok(request)
    }
}
