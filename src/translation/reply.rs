/*!
 * Parsing of the provider's structured reply.
 *
 * Expected shape: `{"translations": [{"id": 0, "text": "..."}, ...]}`.
 * Entries may be missing, duplicated or out of order; lookups are keyed by
 * id and the first entry for an id wins.
 */

use serde_json::Value;
use std::collections::HashMap;

use crate::errors::TranslationError;

/// Id-keyed translations returned for one batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationReply {
    by_id: HashMap<usize, String>,
}

impl TranslationReply {
    /// Parse a raw reply
    ///
    /// Fails only when the reply is not a JSON object. An object without a
    /// usable `translations` array parses to an empty reply.
    pub fn parse(raw: &str) -> Result<Self, TranslationError> {
        let value: Value = serde_json::from_str(strip_code_fence(raw))
            .map_err(|e| TranslationError::Parse(e.to_string()))?;

        let Value::Object(object) = value else {
            return Err(TranslationError::Parse("reply is not a JSON object".to_string()));
        };

        let mut by_id = HashMap::new();
        if let Some(Value::Array(entries)) = object.get("translations") {
            for entry in entries {
                if let (Some(id), Some(text)) = (entry_id(entry), entry_text(entry)) {
                    by_id.entry(id).or_insert(text);
                }
            }
        }

        Ok(Self { by_id })
    }

    /// Translation for an in-batch index, if the provider returned one
    pub fn get(&self, id: usize) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Number of distinct ids returned
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Resolve every index of a batch, falling back to its original text
    ///
    /// Returns the texts and the number of fallbacks used.
    pub fn resolve<'a>(&self, originals: impl Iterator<Item = &'a str>) -> (Vec<String>, usize) {
        let mut fallbacks = 0;
        let texts = originals
            .enumerate()
            .map(|(id, original)| match self.get(id) {
                Some(text) => text.to_string(),
                None => {
                    fallbacks += 1;
                    original.to_string()
                }
            })
            .collect();
        (texts, fallbacks)
    }
}

fn entry_id(entry: &Value) -> Option<usize> {
    match entry.get("id")? {
        Value::Number(n) => match n.as_u64() {
            Some(id) => usize::try_from(id).ok(),
            // Models sometimes echo ids as `1.0`
            None => n
                .as_f64()
                .filter(|id| *id >= 0.0 && id.fract() == 0.0 && *id <= usize::MAX as f64)
                .map(|id| id as usize),
        },
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn entry_text(entry: &Value) -> Option<String> {
    entry.get("text")?.as_str().map(str::to_string)
}

/// Unwrap a reply the model wrapped in a Markdown code fence
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop the info string ("json") on the opening fence line, which may
    // also be glued to the object on a one-line fence
    match inner.find('\n') {
        Some(newline) => inner[newline + 1..].trim(),
        None => {
            let inner = inner.trim_start();
            inner
                .get(..4)
                .filter(|tag| tag.eq_ignore_ascii_case("json"))
                .map_or(inner, |_| &inner[4..])
                .trim()
        }
    }
}
