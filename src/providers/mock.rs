/*!
 * Mock provider implementations for testing.
 *
 * The mock reads the `{id, text}` entries out of the rendered user prompt
 * and answers in the same reply shape a real model is asked for, so the
 * whole pipeline can run without network access:
 * - `MockProvider::working()` - Translates every entry
 * - `MockProvider::dropping(ids)` - Omits the given ids from the reply
 * - `MockProvider::malformed()` - Replies with text that is not JSON
 * - `MockProvider::flaky(n)` - Fails transiently `n` times, then works
 * - `MockProvider::always_transient()` / `permanent()` - Always fail
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, Provider};

/// Prefix the mock puts in front of every translated text
pub const MOCK_PREFIX: &str = "[TRANSLATED] ";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Succeeds but leaves the listed ids out of the reply
    DropIds(Vec<u64>),
    /// Succeeds with entries in reverse order
    Reversed,
    /// Returns text that is not JSON
    Malformed,
    /// Fails with a connection error the first `failures` calls, then works
    Flaky { failures: usize },
    /// Always fails with a rate limit error
    AlwaysTransient,
    /// Always fails with an authentication error
    Permanent,
    /// Works, but earlier calls take longer than later ones
    Staggered { step_ms: u64 },
}

#[derive(Debug, Deserialize)]
struct PromptEntry {
    id: u64,
    text: String,
}

/// Extract the `{id, text}` entries from a rendered user prompt
///
/// The entries are the JSON array that closes the prompt.
pub fn prompt_entries(user_prompt: &str) -> Vec<(u64, String)> {
    let Some(start) = user_prompt.rfind("\n[").map(|i| i + 1).or_else(|| {
        user_prompt.starts_with('[').then_some(0)
    }) else {
        return Vec::new();
    };

    serde_json::from_str::<Vec<PromptEntry>>(&user_prompt[start..])
        .map(|entries| entries.into_iter().map(|e| (e.id, e.text)).collect())
        .unwrap_or_default()
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of `complete` calls made
    request_count: Arc<AtomicUsize>,
    /// Every request received, in call order
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that omits the given ids from every reply
    pub fn dropping(ids: Vec<u64>) -> Self {
        Self::new(MockBehavior::DropIds(ids))
    }

    /// Create a mock that returns entries in reverse order
    pub fn reversed() -> Self {
        Self::new(MockBehavior::Reversed)
    }

    /// Create a mock that replies with non-JSON text
    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    /// Create a mock that fails transiently `failures` times before working
    pub fn flaky(failures: usize) -> Self {
        Self::new(MockBehavior::Flaky { failures })
    }

    /// Create a mock that is always rate limited
    pub fn always_transient() -> Self {
        Self::new(MockBehavior::AlwaysTransient)
    }

    /// Create a mock that always rejects the credentials
    pub fn permanent() -> Self {
        Self::new(MockBehavior::Permanent)
    }

    /// Create a mock whose earlier calls finish last
    pub fn staggered(step_ms: u64) -> Self {
        Self::new(MockBehavior::Staggered { step_ms })
    }

    /// Number of `complete` calls made so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of every request received
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// The translation the mock produces for a source text
    pub fn translate(text: &str) -> String {
        format!("{}{}", MOCK_PREFIX, text)
    }

    fn reply(entries: impl Iterator<Item = (u64, String)>) -> String {
        let translations: Vec<_> = entries
            .map(|(id, text)| json!({ "id": id, "text": Self::translate(&text) }))
            .collect();
        json!({ "translations": translations }).to_string()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let entries = prompt_entries(&request.user_prompt);
        self.requests.lock().push(request);

        match &self.behavior {
            MockBehavior::Working => Ok(Self::reply(entries.into_iter())),

            MockBehavior::DropIds(dropped) => Ok(Self::reply(
                entries.into_iter().filter(|(id, _)| !dropped.contains(id)),
            )),

            MockBehavior::Reversed => Ok(Self::reply(entries.into_iter().rev())),

            MockBehavior::Malformed => Ok("Sure! Here are your translations: 1. ...".to_string()),

            MockBehavior::Flaky { failures } => {
                if count < *failures {
                    Err(ProviderError::ConnectionError(format!(
                        "simulated connection reset #{}",
                        count + 1
                    )))
                } else {
                    Ok(Self::reply(entries.into_iter()))
                }
            }

            MockBehavior::AlwaysTransient => Err(ProviderError::RateLimitExceeded(
                "simulated rate limit".to_string(),
            )),

            MockBehavior::Permanent => Err(ProviderError::AuthenticationError(
                "simulated invalid API key".to_string(),
            )),

            MockBehavior::Staggered { step_ms } => {
                let slots = 8u64.saturating_sub(count as u64 % 8);
                tokio::time::sleep(Duration::from_millis(step_ms * slots)).await;
                Ok(Self::reply(entries.into_iter()))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Permanent => Err(ProviderError::AuthenticationError(
                "simulated invalid API key".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
