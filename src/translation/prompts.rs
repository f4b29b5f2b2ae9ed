/*!
 * Prompt templates for batch translation.
 *
 * The system prompt is picked by translation direction; the user prompt
 * carries the optional context and the batch as a JSON array of
 * `{id, text}` entries keyed by in-batch index.
 */

use serde::Serialize;

use crate::language_utils;
use crate::segments::Segment;
use crate::translation::context::TranslationContext;

/// System prompt template for subtitle translation.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: &'static str,
}

impl PromptTemplate {
    /// Dedicated Korean to English instruction.
    pub const KOREAN_TO_ENGLISH: &'static str = r#"You are an expert Korean to English subtitle translator.

Rules:
1. Translate into natural, fluent English
2. Render technical terms with their established English equivalents
3. Paraphrase colloquial expressions naturally instead of translating word for word
4. Return only the translations as JSON

Output format:
{
  "translations": [
    {"id": 0, "text": "Translated text"},
    {"id": 1, "text": "Translated text"}
  ]
}

Return JSON only. Do not add explanations."#;

    /// Instruction used for every other direction.
    pub const GENERIC: &'static str = r#"You are an expert {source_language} to {target_language} subtitle translator.

Rules:
1. Translate into natural, fluent {target_language}
2. Where a technical term has no common {target_language} form, keep the original term in parentheses
3. Paraphrase colloquial expressions naturally instead of translating word for word
4. Return only the translations as JSON

Output format:
{
  "translations": [
    {"id": 0, "text": "..."},
    {"id": 1, "text": "..."}
  ]
}

Every input id must appear exactly once. Return JSON only. Do not add explanations."#;

    /// Select the template for a translation direction
    pub fn for_direction(source_language: &str, target_language: &str) -> Self {
        let korean_to_english = language_utils::language_codes_match(source_language, "ko")
            && language_utils::language_codes_match(target_language, "en");

        Self {
            template: if korean_to_english {
                Self::KOREAN_TO_ENGLISH
            } else {
                Self::GENERIC
            },
        }
    }

    /// Whether this is the dedicated Korean to English variant
    pub fn is_korean_to_english(&self) -> bool {
        self.template == Self::KOREAN_TO_ENGLISH
    }

    /// Render the template with the language names filled in
    pub fn render(&self, source_language: &str, target_language: &str) -> String {
        self.template
            .replace("{source_language}", &language_utils::display_name(source_language))
            .replace("{target_language}", &language_utils::display_name(target_language))
    }
}

/// One segment as the model sees it
#[derive(Debug, Serialize)]
struct PromptEntry<'a> {
    id: usize,
    text: &'a str,
}

/// Render the user prompt for a batch
///
/// The context block is omitted entirely when the context is empty.
pub fn render_user_prompt(batch: &[Segment], context: &TranslationContext) -> String {
    let entries: Vec<PromptEntry<'_>> = batch
        .iter()
        .enumerate()
        .map(|(id, segment)| PromptEntry {
            id,
            text: &segment.text,
        })
        .collect();

    // Serializing borrowed strings and integers cannot fail
    let entries_json = serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string());

    if context.is_empty() {
        format!("Subtitles to translate:\n{}", entries_json)
    } else {
        format!(
            "Previous context: \"{}\"\n\nSubtitles to translate:\n{}",
            context.as_str(),
            entries_json
        )
    }
}
