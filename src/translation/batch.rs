/*!
 * Batch splitting of subtitle text.
 *
 * The rendered subtitle entries are concatenated into a single buffer which is
 * then cut into chunks of at most `batch_size` characters. Cuts land on the last
 * delimiter inside the budget so that a chunk never ends in the middle of an entry.
 */

use log::debug;

use crate::subtitle_processor::SubtitleEntry;

/// Blank line between two rendered entries
pub const DEFAULT_DELIMITER: &str = "\n\n";

/// Splits rendered subtitle entries into size-bounded chunks
pub struct Batcher<'a> {
    /// Entries to split, in presentation order
    entries: &'a [SubtitleEntry],

    /// Character budget per chunk
    batch_size: usize,

    /// Boundary a chunk may end on
    delimiter: String,
}

impl<'a> Batcher<'a> {
    /// Create a batcher using the blank-line delimiter
    pub fn new(entries: &'a [SubtitleEntry], batch_size: usize) -> Self {
        Self {
            entries,
            batch_size: batch_size.max(1),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }

    /// Use a different boundary string
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Concatenation of every entry's rendering
    pub fn full_text(&self) -> String {
        self.entries.iter().map(SubtitleEntry::as_text).collect()
    }

    /// Produce the ordered chunks. Joining them gives back `full_text()`.
    pub fn get_batches(&self) -> Vec<String> {
        let batches = Self::split_text(&self.full_text(), self.batch_size, &self.delimiter);
        debug!(
            "Split {} entries into {} batches of at most {} chars",
            self.entries.len(),
            batches.len(),
            self.batch_size
        );
        batches
    }

    /// Cut `text` into chunks of at most `batch_size` characters, ending on `delimiter`.
    ///
    /// A chunk only exceeds the budget when no usable delimiter lies inside it; it then
    /// runs to the next delimiter (or the end of the text) instead of splitting an entry.
    pub fn split_text(text: &str, batch_size: usize, delimiter: &str) -> Vec<String> {
        let batch_size = batch_size.max(1);
        let mut batches = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            let cut = match rest.char_indices().nth(batch_size) {
                Some((limit, _)) => Self::chunk_end(rest, limit, delimiter),
                None => rest.len(),
            };

            let (chunk, tail) = rest.split_at(cut);
            debug!("Chunk {}: {} chars", batches.len(), chunk.chars().count());
            batches.push(chunk.to_string());
            rest = tail;
        }

        batches
    }

    // Byte offset where the next chunk ends; always > 0 and on a char boundary.
    fn chunk_end(rest: &str, limit: usize, delimiter: &str) -> usize {
        if delimiter.is_empty() {
            return limit;
        }

        match rest[..limit].rfind(delimiter) {
            Some(pos) if pos > 0 => pos,
            _ => {
                // a delimiter at 0 is the one left over from the previous cut
                let skip = rest.chars().next().map_or(rest.len(), char::len_utf8);
                rest[skip..]
                    .find(delimiter)
                    .map_or(rest.len(), |pos| skip + pos)
            }
        }
    }
}
