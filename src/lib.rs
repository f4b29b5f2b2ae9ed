/*!
 * # subline - batch translation of timed text segments
 *
 * A Rust library that translates subtitle segments for language learners
 * through an LLM completion provider.
 *
 * ## Features
 *
 * - Fixed-size batching with one provider request per batch
 * - Bounded concurrency: windows of batches run together, windows run in order
 * - Trailing context carried from one window to the next
 * - Id-keyed reply parsing with per-segment fallback to the source text
 * - Retry with exponential backoff for transient provider failures
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segments`: Segment data model and request/response envelope
 * - `translation`: The batch translation pipeline:
 *   - `translation::core`: Window scheduler (`TranslationService`)
 *   - `translation::batch`: Chunking and single-batch translation
 *   - `translation::context`: Context carried across windows
 *   - `translation::prompts`: Prompt templates
 *   - `translation::reply`: Reply parsing
 *   - `translation::retry`: Retry policy
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Completion provider clients:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod segments;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, TranslationError};
pub use segments::{Segment, TranslateRequest, TranslateResponse, TranslatedSegment};
pub use translation::TranslationService;
