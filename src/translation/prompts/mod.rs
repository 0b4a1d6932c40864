/*!
 * Prompt construction for subtitle translation.
 */

pub mod templates;

pub use templates::{
    TranslationPromptBuilder, CLOSE_MARKER, DEFAULT_MODERATION_HINT, OPEN_MARKER,
};
