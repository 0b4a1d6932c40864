use std::fmt;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use log::debug;

use crate::errors::{BlockError, SubtitleError};
use crate::file_utils::FileManager;

// @module: Subtitle entries and SRT file handling

/// Separator between start and end time on the second line of a block
pub const TIME_RANGE_SEPARATOR: &str = "-->";

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence token, kept as written
    index: String,

    // @field: Start timestamp, kept verbatim
    start_time: String,

    // @field: End timestamp, kept verbatim
    end_time: String,

    // @field: Caption lines joined with '\n'
    text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry. Timestamps are not validated.
    pub fn new(
        index: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        SubtitleEntry {
            index: index.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            text: text.into(),
        }
    }

    /// Build an entry from the lines of one paragraph.
    ///
    /// Line 1 is the index, line 2 is `<start> --> <end>`, the remaining lines are
    /// the caption text.
    pub fn from_block(lines: &[&str]) -> Result<Self, BlockError> {
        if lines.len() < 3 {
            return Err(BlockError::TooFewLines(lines.len()));
        }

        let index = lines[0].trim();
        if index.is_empty() {
            return Err(BlockError::EmptyIndex);
        }

        let (start_time, end_time) = Self::split_time_range(lines[1])
            .ok_or_else(|| BlockError::MissingTimeRange(lines[1].trim().to_string()))?;

        Ok(SubtitleEntry {
            index: index.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            text: lines[2..].join("\n"),
        })
    }

    // Exactly one separator with something on both sides
    fn split_time_range(line: &str) -> Option<(&str, &str)> {
        let mut parts = line.split(TIME_RANGE_SEPARATOR);
        let start = parts.next()?.trim();
        let end = parts.next()?.trim();
        if parts.next().is_some() || start.is_empty() || end.is_empty() {
            return None;
        }
        Some((start, end))
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns a copy of this entry carrying different text
    pub fn replace_text(&self, text: impl Into<String>) -> Self {
        SubtitleEntry {
            index: self.index.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            text: text.into(),
        }
    }

    /// The SRT rendering of this entry, blank separator line included
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} {} {}", self.start_time, TIME_RANGE_SEPARATOR, self.end_time)?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered subtitle entries bound to one SRT file
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// File the entries were read from or will be written to
    pub path: PathBuf,

    entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty collection bound to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SubtitleCollection {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Read and parse an SRT file. Any malformed block aborts the parse.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;

        let entries = Self::parse_srt_string(&content)?;
        debug!("Subtitles parsed: {} from {:?}", entries.len(), path);

        Ok(SubtitleCollection {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Parse SRT content into entries, in file order
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut blocks: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                continue;
            }
            current.push(line);
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        debug!("Subtitles discovered: {}", blocks.len());

        blocks
            .iter()
            .enumerate()
            .map(|(i, lines)| {
                SubtitleEntry::from_block(lines)
                    .map_err(|source| SubtitleError::MalformedBlock { block: i + 1, source })
            })
            .collect()
    }

    /// Append an entry at the end
    pub fn add(&mut self, entry: SubtitleEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All renderings concatenated in order
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(SubtitleEntry::as_text).collect()
    }

    /// Write the collection to its own path, overwriting any existing file
    pub fn write(&self) -> Result<(), SubtitleError> {
        self.write_to(&self.path)
    }

    /// Write subtitles to an SRT file
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        let io_error = |source| SubtitleError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut file = File::create(path).map_err(io_error)?;
        for entry in &self.entries {
            write!(file, "{}", entry).map_err(io_error)?;
        }

        Ok(())
    }
}
