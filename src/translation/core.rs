/*!
 * Core translation service implementation.
 *
 * `TranslationService::translate_all` chunks the input, then runs windows
 * of up to `concurrent_batches` batches at a time. A window starts only
 * after the previous one completed, because its context is derived from
 * the previous window's last batch. Output is assembled in submission
 * order, so `output[i]` always belongs to `input[i]`.
 */

use futures::future::join_all;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, FailurePolicy, PipelineConfig};
use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::segments::{Segment, TranslatedSegment};

use super::batch::{BatchOutcome, BatchTranslator, chunk};
use super::context::{ContextCarrier, TranslationContext};
use super::retry::RetryPolicy;

/// Translation options for customizing the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOptions {
    /// Segments per batch
    pub batch_size: usize,

    /// Segments carried over as context
    pub context_size: usize,

    /// Batches per concurrent window
    pub concurrent_batches: usize,

    /// Handling of batches that exhaust their retries
    pub failure_policy: FailurePolicy,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            batch_size: 10,
            context_size: 2,
            concurrent_batches: 3,
            failure_policy: FailurePolicy::Fallback,
        }
    }
}

impl From<&PipelineConfig> for TranslationOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            context_size: config.context_size,
            concurrent_batches: config.concurrent_batches,
            failure_policy: config.failure_policy,
        }
    }
}

/// Summary of one `translate_all` run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationStats {
    /// Input segments
    pub segments: usize,
    /// Batches sent
    pub batches: usize,
    /// Windows run
    pub windows: usize,
    /// Batches whose segments all passed through untranslated
    pub fallback_batches: usize,
    /// Segments passed through untranslated
    pub fallback_segments: usize,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl TranslationStats {
    /// Generate a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} segments in {} batches ({} windows), {} segments passed through untranslated, {:.2}s",
            self.segments,
            self.batches,
            self.windows,
            self.fallback_segments,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Main translation service for segment translation
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Per-batch translator
    translator: BatchTranslator,

    /// Pipeline options, validated at construction
    options: TranslationOptions,

    /// Derives window-to-window context
    carrier: ContextCarrier,
}

impl TranslationService {
    /// Create a new translation service
    pub fn new(
        provider: Arc<dyn Provider>,
        options: TranslationOptions,
        retry: RetryPolicy,
    ) -> Result<Self, TranslationError> {
        if options.batch_size == 0 {
            return Err(TranslationError::Configuration(
                "batch size must be at least 1".to_string(),
            ));
        }
        if options.concurrent_batches == 0 {
            return Err(TranslationError::Configuration(
                "concurrent batches must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            translator: BatchTranslator::new(provider, retry),
            carrier: ContextCarrier::new(options.context_size),
            options,
        })
    }

    /// Create a service with the pipeline and retry settings of `config`
    pub fn from_config(provider: Arc<dyn Provider>, config: &Config) -> Result<Self, TranslationError> {
        Self::new(
            provider,
            TranslationOptions::from(&config.pipeline),
            config.retry.to_policy(),
        )
    }

    /// The options this service was built with
    pub fn options(&self) -> &TranslationOptions {
        &self.options
    }

    /// Translate every segment, preserving input order
    pub async fn translate_all(
        &self,
        segments: &[Segment],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<TranslatedSegment>, TranslationError> {
        let (translated, _) = self
            .translate_all_with_stats(segments, source_language, target_language)
            .await?;
        Ok(translated)
    }

    /// Translate every segment and report what happened
    pub async fn translate_all_with_stats(
        &self,
        segments: &[Segment],
        source_language: &str,
        target_language: &str,
    ) -> Result<(Vec<TranslatedSegment>, TranslationStats), TranslationError> {
        let start_time = Instant::now();
        let mut stats = TranslationStats {
            segments: segments.len(),
            ..Default::default()
        };

        if segments.is_empty() {
            return Ok((Vec::new(), stats));
        }

        info!(
            "Starting translation: {} segments ({} -> {})",
            segments.len(),
            source_language,
            target_language
        );

        let batches = chunk(segments, self.options.batch_size)?;
        stats.batches = batches.len();
        info!("Created {} batches (size: {})", batches.len(), self.options.batch_size);

        let mut translated = Vec::with_capacity(segments.len());
        let mut context = TranslationContext::empty();

        for (window_index, window) in batches.chunks(self.options.concurrent_batches).enumerate() {
            let first_batch = window_index * self.options.concurrent_batches;
            let outcomes = self
                .translate_window(window, first_batch, batches.len(), &context, source_language, target_language)
                .await?;

            for (batch, outcome) in window.iter().zip(outcomes) {
                if outcome.is_full_fallback() {
                    stats.fallback_batches += 1;
                }
                stats.fallback_segments += outcome.fallback_segments;
                translated.extend(
                    batch
                        .iter()
                        .zip(outcome.texts)
                        .map(|(segment, text)| TranslatedSegment::from_segment(segment, text)),
                );
            }

            context = self.carrier.advance(window);
            stats.windows += 1;
            info!(
                "Batch progress: {}/{}",
                (first_batch + window.len()).min(batches.len()),
                batches.len()
            );
        }

        stats.elapsed = start_time.elapsed();
        info!("Translation completed: {}", stats.summary());

        Ok((translated, stats))
    }

    /// Translate one window concurrently, returning outcomes in submission order
    async fn translate_window(
        &self,
        window: &[&[Segment]],
        first_batch: usize,
        total_batches: usize,
        context: &TranslationContext,
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<BatchOutcome>, TranslationError> {
        let tasks = window.iter().enumerate().map(|(offset, batch)| async move {
            let batch_number = first_batch + offset + 1;
            debug!("Translating batch {}/{}", batch_number, total_batches);
            let start_time = Instant::now();
            let result = self
                .translator
                .translate(batch, source_language, target_language, context)
                .await;
            debug!("Batch {} finished in {:?}", batch_number, start_time.elapsed());
            (batch_number, result)
        });

        let mut outcomes = Vec::with_capacity(window.len());
        for ((batch_number, result), batch) in join_all(tasks).await.into_iter().zip(window) {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => match self.options.failure_policy {
                    FailurePolicy::Fallback => {
                        warn!(
                            "Batch {} failed after retries, passing {} segments through: {}",
                            batch_number,
                            batch.len(),
                            e
                        );
                        outcomes.push(BatchOutcome::fallback(batch));
                    }
                    FailurePolicy::Abort => {
                        error!("Batch {} failed after retries: {}", batch_number, e);
                        return Err(TranslationError::Provider(e));
                    }
                },
            }
        }

        Ok(outcomes)
    }
}
