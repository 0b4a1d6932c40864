/*!
 * # srtglot - SRT subtitle translation with LLMs
 *
 * A Rust library for translating `.srt` subtitle files with a chat-completion model.
 *
 * ## Features
 *
 * - Parse and render SRT files without touching timestamps
 * - Split subtitles into size-bounded batches that never cut an entry in half
 * - Translate batches using various AI providers:
 *   - OpenAI API
 *   - LM Studio (OpenAI-compatible local server)
 *   - Ollama (local LLM)
 * - Re-send batches whose reply is not valid SRT, with a corrective hint
 * - One output file per target language
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Subtitle entries and SRT file handling
 * - `translation`: Batching, prompts, provider calls and reply parsing:
 *   - `translation::batch`: Splitting subtitles into batches
 *   - `translation::prompts`: Prompt phrasing and payload markers
 *   - `translation::core`: Sending one batch to a provider
 *   - `translation::reply`: Parsing translated replies
 * - `file_utils`: File system operations
 * - `app_controller`: Per-language orchestration of batches
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::openai`: OpenAI (and LM Studio) API client
 *   - `providers::ollama`: Ollama API client
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
pub mod file_utils;
pub mod subtitle_processor;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, LanguageOutcome, LanguageReport};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use translation::TranslationService;
pub use language_utils::{normalize_to_part2t, get_language_name};
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
