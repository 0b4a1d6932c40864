/*!
 * Translation of subtitle batches using AI providers.
 *
 * - `batch`: splitting rendered subtitles into size-bounded chunks
 * - `prompts`: prompt phrasing and payload markers
 * - `core`: the service that sends one batch to a provider
 * - `reply`: turning a reply back into subtitle entries
 */

// Re-export main types for easier usage
pub use self::batch::Batcher;
pub use self::core::TranslationService;
pub use self::prompts::TranslationPromptBuilder;
pub use self::reply::parse_reply;

// Submodules
pub mod batch;
pub mod core;
pub mod prompts;
pub mod reply;
