//! Coordinate mapping
//!
//! Segments are positioned in the byte space of the text handed to
//! `compare()`. For sentence-level comparisons that text is usually a
//! concatenation of paragraphs the user selected, so this module also maps
//! positions back to whole-document paragraph coordinates.

use serde::{Deserialize, Serialize};

/// Represents a span of bytes in text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ByteSpan {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl ByteSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Find `needle` in `haystack`, preferring the first occurrence at or after
/// `from` and falling back to the first occurrence anywhere.
pub fn locate_from(haystack: &str, needle: &str, from: usize) -> Option<ByteSpan> {
    let from = from.min(haystack.len());
    let forward = haystack
        .get(from..)
        .and_then(|tail| tail.find(needle))
        .map(|pos| pos + from);

    forward
        .or_else(|| haystack.find(needle))
        .map(|start| ByteSpan::new(start, start + needle.len()))
}

/// Maps paragraphs of a compared text back to the whole document
///
/// The k-th non-blank paragraph of the compared text corresponds to
/// `selected[k]`. Without a selection (or past its end) the paragraph keeps
/// its own line index.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphMap<'a> {
    selected: &'a [usize],
    full: &'a [String],
}

impl<'a> ParagraphMap<'a> {
    pub fn new(selected: &'a [usize], full: &'a [String]) -> Self {
        Self { selected, full }
    }

    /// Whole-document paragraph index for the `ordinal`-th non-blank paragraph
    pub fn paragraph_index(&self, ordinal: usize, line_index: usize) -> usize {
        self.selected.get(ordinal).copied().unwrap_or(line_index)
    }

    /// Full text of a whole-document paragraph, if the host supplied it
    pub fn full_paragraph(&self, paragraph_index: usize) -> Option<&'a str> {
        self.full.get(paragraph_index).map(String::as_str)
    }

    /// Locate `text` inside its whole-document paragraph (first occurrence)
    pub fn locate(&self, paragraph_index: usize, text: &str) -> Option<ByteSpan> {
        if text.is_empty() {
            return None;
        }
        self.full_paragraph(paragraph_index)
            .and_then(|paragraph| locate_from(paragraph, text, 0))
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }
}
