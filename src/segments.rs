/*!
 * Segment data model and the request/response envelope around it.
 *
 * A `Segment` is one timed unit of source text. Segments are identified
 * only by their position, so every type here keeps input order intact.
 */

use serde::{Deserialize, Serialize};

use crate::errors::TranslationError;
use crate::language_utils;

/// One timed unit of source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Source text
    pub text: String,
}

impl Segment {
    /// Create a new segment
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Check the timing invariants (`0 <= start <= end`, both finite)
    pub fn validate(&self) -> Result<(), String> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err("timestamps must be finite".to_string());
        }
        if self.start < 0.0 {
            return Err(format!("start must be >= 0, got {}", self.start));
        }
        if self.end < self.start {
            return Err(format!(
                "end ({}) must not be before start ({})",
                self.end, self.start
            ));
        }
        Ok(())
    }
}

/// Translation result for one input segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedSegment {
    pub start: f64,
    pub end: f64,
    pub original_text: String,
    pub translated_text: String,
}

impl TranslatedSegment {
    /// Pair a source segment with its translation
    pub fn from_segment(segment: &Segment, translated_text: impl Into<String>) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
            original_text: segment.text.clone(),
            translated_text: translated_text.into(),
        }
    }

    /// Whether the translated text is just the original passed through
    pub fn is_passthrough(&self) -> bool {
        self.translated_text == self.original_text
    }
}

/// Incoming translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub segments: Vec<Segment>,

    #[serde(default = "default_source_language")]
    pub source_language: String,

    #[serde(default = "default_target_language")]
    pub target_language: String,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ko".to_string()
}

impl TranslateRequest {
    /// Create a request with the default `en -> ko` direction
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            source_language: default_source_language(),
            target_language: default_target_language(),
        }
    }

    /// Override the translation direction
    pub fn with_languages(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_language = source.into();
        self.target_language = target.into();
        self
    }

    /// Validate the request before it reaches the pipeline
    pub fn validate(&self) -> Result<(), TranslationError> {
        if self.segments.is_empty() {
            return Err(TranslationError::Validation {
                index: 0,
                message: "at least one segment is required".to_string(),
            });
        }

        for (index, segment) in self.segments.iter().enumerate() {
            segment
                .validate()
                .map_err(|message| TranslationError::Validation { index, message })?;
        }

        for code in [&self.source_language, &self.target_language] {
            if language_utils::validate_language_code(code).is_err() {
                return Err(TranslationError::Configuration(format!(
                    "Unsupported language code: '{}'",
                    code
                )));
            }
        }

        Ok(())
    }
}

/// Segments payload of a response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationData {
    pub segments: Vec<TranslatedSegment>,
}

/// Response metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationMeta {
    /// Always the full expected count, fallbacks included
    pub translated_count: usize,
    /// Wall time in seconds, rounded to milliseconds
    pub processing_time: f64,
}

/// Outgoing translation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub success: bool,
    pub data: TranslationData,
    pub meta: TranslationMeta,
}

impl TranslateResponse {
    /// Build a successful response from the pipeline output
    pub fn new(segments: Vec<TranslatedSegment>, processing_secs: f64) -> Self {
        let translated_count = segments.len();
        Self {
            success: true,
            data: TranslationData { segments },
            meta: TranslationMeta {
                translated_count,
                processing_time: (processing_secs * 1000.0).round() / 1000.0,
            },
        }
    }
}
