/*!
 * Batch translation pipeline.
 *
 * - `batch`: chunking and single-batch translation with fallback
 * - `context`: trailing context carried between windows
 * - `core`: the window scheduler (`TranslationService`)
 * - `prompts`: system prompt selection and user prompt rendering
 * - `reply`: id-keyed parsing of the provider's JSON reply
 * - `retry`: retry policy for transient provider failures
 */

// Re-export main types for easier usage
pub use self::batch::{BatchOutcome, BatchTranslator, chunk};
pub use self::context::{ContextCarrier, TranslationContext};
pub use self::core::{TranslationOptions, TranslationService, TranslationStats};
pub use self::prompts::{PromptTemplate, render_user_prompt};
pub use self::reply::TranslationReply;
pub use self::retry::RetryPolicy;

// Submodules
pub mod batch;
pub mod context;
pub mod core;
pub mod prompts;
pub mod reply;
pub mod retry;
