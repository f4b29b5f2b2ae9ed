/*!
 * Scripted provider for tests that need per-call control
 *
 * The library's `MockProvider` covers fixed behaviours. `ScriptedProvider`
 * answers each call from a queue keyed by the first segment text in the
 * prompt, so a test can decide exactly what every batch receives no
 * matter in which order concurrent batches reach the provider.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use subline::errors::ProviderError;
use subline::providers::mock::{MockProvider, prompt_entries};
use subline::providers::{CompletionRequest, Provider};

/// What a scripted call returns
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Translate every entry except the listed ids
    TranslateExcept(Vec<u64>),
    /// Return this raw text
    Raw(String),
    /// Fail with this error
    Fail(ProviderError),
}

/// Records every call and answers from per-batch scripts
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    /// Queued answers per first-segment text; exhausted queues translate everything
    scripts: Mutex<HashMap<String, Vec<Scripted>>>,
    /// User prompts received, in call order
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue answers for the batch whose first segment text is `first_text`
    pub fn script(&self, first_text: &str, answers: Vec<Scripted>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(first_text.to_string(), answers);
    }

    /// Prompts whose first entry is `first_text`
    pub fn prompts_for(&self, first_text: &str) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| prompt_entries(p).first().map(|(_, t)| t.as_str()) == Some(first_text))
            .cloned()
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn translate_except(entries: &[(u64, String)], skipped: &[u64]) -> String {
        let translations: Vec<_> = entries
            .iter()
            .filter(|(id, _)| !skipped.contains(id))
            .map(|(id, text)| serde_json::json!({"id": id, "text": MockProvider::translate(text)}))
            .collect();
        serde_json::json!({ "translations": translations }).to_string()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let entries = prompt_entries(&request.user_prompt);
        self.prompts.lock().unwrap().push(request.user_prompt.clone());

        let key = entries.first().map(|(_, t)| t.clone()).unwrap_or_default();
        let answer = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(&key) {
                Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                _ => None,
            }
        };

        match answer {
            None => Ok(Self::translate_except(&entries, &[])),
            Some(Scripted::TranslateExcept(ids)) => Ok(Self::translate_except(&entries, &ids)),
            Some(Scripted::Raw(text)) => Ok(text),
            Some(Scripted::Fail(error)) => Err(error),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
