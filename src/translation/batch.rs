/*!
 * Batch translation processing.
 *
 * `chunk` partitions the input into contiguous batches. `BatchTranslator`
 * sends one batch to the provider and always hands back exactly one text
 * per segment: provider translations where the reply has them, original
 * texts everywhere else.
 */

use log::{debug, error, warn};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::providers::{CompletionRequest, Provider};
use crate::segments::Segment;

use super::context::TranslationContext;
use super::prompts::{PromptTemplate, render_user_prompt};
use super::reply::TranslationReply;
use super::retry::RetryPolicy;

/// Split `segments` into contiguous batches of at most `size` segments
///
/// Produces `ceil(len / size)` batches whose concatenation is the input.
pub fn chunk(segments: &[Segment], size: usize) -> Result<Vec<&[Segment]>, TranslationError> {
    if size == 0 {
        return Err(TranslationError::Configuration(
            "batch size must be at least 1".to_string(),
        ));
    }
    Ok(segments.chunks(size).collect())
}

/// Result of translating one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// One text per segment, in batch order
    pub texts: Vec<String>,
    /// How many of them are original text passed through
    pub fallback_segments: usize,
}

impl BatchOutcome {
    /// Every segment passes its original text through
    pub fn fallback(batch: &[Segment]) -> Self {
        Self {
            texts: batch.iter().map(|segment| segment.text.clone()).collect(),
            fallback_segments: batch.len(),
        }
    }

    /// Whether no segment of the batch got a provider translation
    pub fn is_full_fallback(&self) -> bool {
        self.fallback_segments == self.texts.len()
    }
}

/// Translator for a single batch of segments
#[derive(Debug, Clone)]
pub struct BatchTranslator {
    /// The completion provider
    provider: Arc<dyn Provider>,

    /// Retry policy around the provider call
    retry: RetryPolicy,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(provider: Arc<dyn Provider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Translate one batch
    ///
    /// Parse failures and permanent provider errors degrade to the batch's
    /// original texts. Only transient errors that outlived every retry are
    /// returned, so the caller can apply its failure policy.
    pub async fn translate(
        &self,
        batch: &[Segment],
        source_language: &str,
        target_language: &str,
        context: &TranslationContext,
    ) -> Result<BatchOutcome, ProviderError> {
        if batch.is_empty() {
            return Ok(BatchOutcome {
                texts: Vec::new(),
                fallback_segments: 0,
            });
        }

        let system_prompt =
            PromptTemplate::for_direction(source_language, target_language).render(source_language, target_language);
        let request = CompletionRequest::json(system_prompt, render_user_prompt(batch, context));

        let result = self
            .retry
            .run(
                "Batch translation",
                || self.provider.complete(request.clone()),
                ProviderError::is_transient,
            )
            .await;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) if e.is_transient() => return Err(e),
            Err(e) => {
                error!("{} rejected batch of {} segments: {}", self.provider.name(), batch.len(), e);
                return Ok(BatchOutcome::fallback(batch));
            }
        };

        let reply = match TranslationReply::parse(&raw) {
            Ok(reply) => reply,
            Err(e) => {
                error!("Failed to parse translation reply: {}", e);
                return Ok(BatchOutcome::fallback(batch));
            }
        };

        let (texts, fallback_segments) = reply.resolve(batch.iter().map(|segment| segment.text.as_str()));
        if fallback_segments > 0 {
            warn!(
                "Reply covered {}/{} segments, passing {} through untranslated",
                batch.len() - fallback_segments,
                batch.len(),
                fallback_segments
            );
        } else {
            debug!("Reply covered all {} segments", batch.len());
        }

        Ok(BatchOutcome {
            texts,
            fallback_segments,
        })
    }
}
