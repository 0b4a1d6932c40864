/*!
 * Error types for the srtglot application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Why a single subtitle paragraph could not be turned into an entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Index, time range and text need at least three lines
    #[error("expected at least 3 lines (index, time range, text), found {0}")]
    TooFewLines(usize),

    /// The second line is not `<start> --> <end>`
    #[error("invalid time range line: '{0}'")]
    MissingTimeRange(String),

    /// The first line is blank
    #[error("empty subtitle index")]
    EmptyIndex,
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The input path is missing or is not an `.srt` file
    #[error("Invalid input file {path:?}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    /// A paragraph of the source file is malformed
    #[error("Malformed subtitle block {block}: {source}")]
    MalformedBlock {
        /// 1-based paragraph number
        block: usize,
        #[source]
        source: BlockError,
    },

    /// Reading or writing a subtitle file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The reply did not split back into well-formed subtitle paragraphs
    #[error("Malformed reply paragraph {paragraph}: {source}")]
    MalformedReply {
        /// 1-based paragraph number inside the reply
        paragraph: usize,
        #[source]
        source: BlockError,
    },
}

impl TranslationError {
    /// Whether re-sending the same batch with a corrective hint may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedReply { .. })
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
