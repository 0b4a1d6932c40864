/*!
 * Parsing of translated replies.
 *
 * A reply is expected to be SRT text: paragraphs separated by blank lines, each
 * holding an index, a time range and one or more lines of text. Models sometimes
 * echo the bracket markers around the payload; those are dropped.
 */

use log::{debug, warn};

use crate::errors::{BlockError, TranslationError};
use crate::subtitle_processor::SubtitleEntry;
use crate::translation::prompts::{CLOSE_MARKER, OPEN_MARKER};

/// Paragraph separator inside a reply
pub const REPLY_DELIMITER: &str = "\n\n";

/// Parse a whole reply. Either every paragraph parses or nothing is returned.
///
/// A blank reply is a malformed one: the batch it answers must be sent again.
pub fn parse_reply(reply: &str) -> Result<Vec<SubtitleEntry>, TranslationError> {
    let reply = reply.replace("\r\n", "\n");
    if reply.trim().is_empty() {
        return Err(TranslationError::MalformedReply {
            paragraph: 1,
            source: BlockError::TooFewLines(0),
        });
    }

    let mut entries = Vec::new();

    for (i, paragraph) in reply.split(REPLY_DELIMITER).enumerate() {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            debug!("Skipping empty reply paragraph {}", i + 1);
            continue;
        }

        let mut lines: Vec<&str> = paragraph.lines().collect();

        if is_marker_only(&lines) {
            warn!("Unparsable parts were found: {:?}", lines);
            continue;
        }

        strip_markers(&mut lines);

        let entry = SubtitleEntry::from_block(&lines)
            .map_err(|source| TranslationError::MalformedReply { paragraph: i + 1, source })?;
        entries.push(entry);
    }

    Ok(entries)
}

fn is_marker_only(lines: &[&str]) -> bool {
    matches!(lines, [line] if is_marker(line))
}

fn is_marker(line: &str) -> bool {
    let line = line.trim();
    line == OPEN_MARKER || line == CLOSE_MARKER
}

// Markers glued to the first or last line of a real paragraph
fn strip_markers(lines: &mut Vec<&str>) {
    if lines.first().is_some_and(|line| line.trim() == OPEN_MARKER) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|line| line.trim() == CLOSE_MARKER) {
        lines.pop();
    }
}
