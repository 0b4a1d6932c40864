use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::SubtitleError;

// @module: File and directory utilities

/// Extension accepted for input files
pub const SUBTITLE_EXTENSION: &str = "srt";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Input is an existing file named *.srt
    pub fn validate_subtitle_input<P: AsRef<Path>>(path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        let invalid = |reason: &str| SubtitleError::InvalidInput {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        if !Self::file_exists(path) {
            return Err(invalid("file does not exist"));
        }

        let is_srt = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SUBTITLE_EXTENSION));
        if !is_srt {
            return Err(invalid("expected an .srt file"));
        }

        Ok(())
    }

    // @generates: Output path for a translated subtitle
    // @example: movies/film.srt + "de" -> movies/film_de.srt
    pub fn translated_output_path<P: AsRef<Path>>(input_file: P, target_language: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let file_name = format!("{}_{}.{}", stem, Self::sanitize_label(target_language), SUBTITLE_EXTENSION);
        input_file.with_file_name(file_name)
    }

    // Keeps a language label usable inside a file name
    fn sanitize_label(label: &str) -> String {
        label
            .trim()
            .chars()
            .map(|c| if c == '/' || c == '\\' || c.is_whitespace() { '_' } else { c })
            .collect()
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String, SubtitleError> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|source| SubtitleError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
