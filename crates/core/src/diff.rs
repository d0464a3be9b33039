//! Diff result types and assembly

use crate::algorithm::AlgorithmMetadata;
use crate::char_diff::{self, CharOp};
use crate::mapping::{ByteSpan, ParagraphMap};
use crate::matching::{MatchSet, SegmentMatch};
use crate::segmenter::Segment;
use crate::word_diff::{self, WordChange};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Kind of a renderable change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Unchanged,
}

/// Which document an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// One renderable unit of change
///
/// `start`/`end` are byte offsets in the text passed to `compare()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffEntry {
    pub value: String,
    pub kind: ChangeKind,
    pub side: Side,
    pub start: usize,
    pub end: usize,
    pub paragraph_index: usize,
    /// Segment id on its own side, usable as a render key
    pub segment_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl DiffEntry {
    pub fn from_segment(kind: ChangeKind, side: Side, segment: &Segment) -> Self {
        Self {
            value: segment.text.clone(),
            kind,
            side,
            start: segment.start,
            end: segment.end,
            paragraph_index: segment.paragraph_index.unwrap_or(segment.id),
            segment_index: segment.id,
            similarity: None,
        }
    }

    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = Some(similarity);
        self
    }

    /// Get a human-readable description of this entry
    pub fn description(&self) -> String {
        let side = match self.side {
            Side::Left => "left",
            Side::Right => "right",
        };
        match (self.kind, self.similarity) {
            (ChangeKind::Added, Some(s)) => format!("Edited ({side}, {s:.2}): \"{}\"", self.value),
            (ChangeKind::Removed, Some(s)) => format!("Edited ({side}, {s:.2}): \"{}\"", self.value),
            (ChangeKind::Added, None) => format!("Added: \"{}\"", self.value),
            (ChangeKind::Removed, None) => format!("Removed: \"{}\"", self.value),
            (ChangeKind::Unchanged, _) => format!("Unchanged ({side}): \"{}\"", self.value),
        }
    }
}

/// A fuzzy-matched segment pair, for renderers that link edited segments
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuzzyPair {
    pub left_index: usize,
    pub right_index: usize,
    pub left_text: String,
    pub right_text: String,
    pub left_paragraph: usize,
    pub right_paragraph: usize,
    pub similarity: f64,
}

/// Word alignment of one matched pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDiffPair {
    pub left_index: usize,
    pub right_index: usize,
    pub similarity: f64,
    pub changes: Vec<WordChange>,
}

/// Character runs of one matched pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharDiffPair {
    pub left_index: usize,
    pub right_index: usize,
    pub similarity: f64,
    pub ops: Vec<CharOp>,
}

/// Where a sentence sits in the whole document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceLocation {
    pub segment_index: usize,
    pub paragraph_index: usize,
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Span inside the full paragraph text, when the host supplied it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_span: Option<ByteSpan>,
}

/// Sentence positions for both sides of a sentence-level comparison
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SentenceInfo {
    pub left: Vec<SentenceLocation>,
    pub right: Vec<SentenceLocation>,
}

impl SentenceInfo {
    pub fn locate(
        left: &[Segment],
        right: &[Segment],
        left_map: ParagraphMap<'_>,
        right_map: ParagraphMap<'_>,
    ) -> Self {
        Self {
            left: locate_side(left, left_map),
            right: locate_side(right, right_map),
        }
    }
}

fn locate_side(segments: &[Segment], map: ParagraphMap<'_>) -> Vec<SentenceLocation> {
    segments
        .iter()
        .map(|segment| {
            let paragraph_index = segment.paragraph_index.unwrap_or(segment.id);
            SentenceLocation {
                segment_index: segment.id,
                paragraph_index,
                text: segment.text.clone(),
                start: segment.start,
                end: segment.end,
                paragraph_span: map.locate(paragraph_index, &segment.text),
            }
        })
        .collect()
}

/// Algorithm-specific renderer conveniences
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extensions {
    pub fuzzy_matched_pairs: Vec<FuzzyPair>,
    pub word_diff: Vec<WordDiffPair>,
    pub character_diff_pairs: Vec<CharDiffPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_info: Option<SentenceInfo>,
}

/// Statistics about the diff
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStatistics {
    pub left_segments: usize,
    pub right_segments: usize,
    pub exact: usize,
    pub fuzzy: usize,
    pub removed: usize,
    pub added: usize,
}

impl DiffStatistics {
    fn from_matches(matches: &MatchSet) -> Self {
        Self {
            left_segments: matches.left_count,
            right_segments: matches.right_count,
            exact: matches.exact_matches.len(),
            fuzzy: matches.fuzzy_matches.len(),
            removed: matches.unmatched_left.len(),
            added: matches.unmatched_right.len(),
        }
    }
}

/// Complete result of one comparison
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub diff: Vec<DiffEntry>,
    pub matches: MatchSet,
    pub metadata: AlgorithmMetadata,
    pub timestamp: DateTime<Utc>,
    pub extensions: Extensions,
    pub statistics: DiffStatistics,
}

impl DiffResult {
    pub fn new(
        metadata: AlgorithmMetadata,
        matches: MatchSet,
        diff: Vec<DiffEntry>,
        extensions: Extensions,
    ) -> Self {
        let statistics = DiffStatistics::from_matches(&matches);
        Self {
            diff,
            matches,
            metadata,
            timestamp: Utc::now(),
            extensions,
            statistics,
        }
    }

    /// No added or removed content
    pub fn is_empty(&self) -> bool {
        self.diff.iter().all(|e| e.kind == ChangeKind::Unchanged)
    }

    /// Entries that are not `Unchanged`
    pub fn changed_entries(&self) -> Vec<&DiffEntry> {
        self.diff
            .iter()
            .filter(|e| e.kind != ChangeKind::Unchanged)
            .collect()
    }

    /// Get a summary of the diff
    pub fn summary(&self) -> String {
        format!(
            "{}: {} exact, {} fuzzy, {} removed, {} added ({} left / {} right segments)",
            self.metadata.display_name,
            self.statistics.exact,
            self.statistics.fuzzy,
            self.statistics.removed,
            self.statistics.added,
            self.statistics.left_segments,
            self.statistics.right_segments,
        )
    }

    /// Serialize for the host boundary
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Diff Result ===")?;
        writeln!(f, "{}", self.summary())?;
        writeln!(f, "\nEntries:")?;

        for (i, entry) in self.diff.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, entry.description())?;
        }

        Ok(())
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Walks a `MatchSet` and emits positioned entries plus pair details
pub struct DiffAssembler<'a> {
    left: &'a [Segment],
    right: &'a [Segment],
    matches: &'a MatchSet,
    include_unchanged: bool,
}

impl<'a> DiffAssembler<'a> {
    pub fn new(left: &'a [Segment], right: &'a [Segment], matches: &'a MatchSet) -> Self {
        Self {
            left,
            right,
            matches,
            include_unchanged: false,
        }
    }

    pub fn with_unchanged(mut self, include: bool) -> Self {
        self.include_unchanged = include;
        self
    }

    /// Entries in lockstep order
    ///
    /// Unmatched left segments become `Removed`, unmatched right segments
    /// `Added`, fuzzy pairs a `Removed` + `Added` pair carrying the
    /// similarity. Exact pairs emit nothing unless unchanged entries were
    /// requested. Each segment appears at most once.
    pub fn entries(&self) -> Vec<DiffEntry> {
        let (left_len, right_len) = (self.left.len(), self.right.len());
        let mut entries = Vec::new();
        let mut i = 0;
        let mut j = 0;

        while i < left_len || j < right_len {
            if i < left_len && !self.matches.is_left_matched(i) {
                entries.push(DiffEntry::from_segment(ChangeKind::Removed, Side::Left, &self.left[i]));
                i += 1;
                continue;
            }
            if j < right_len && !self.matches.is_right_matched(j) {
                entries.push(DiffEntry::from_segment(ChangeKind::Added, Side::Right, &self.right[j]));
                j += 1;
                continue;
            }

            if i < left_len {
                if let Some(r) = self.matches.right_for(i) {
                    self.push_pair(&mut entries, i, r);
                }
                i += 1;
            }
            // Matched right segments are emitted with their left partner
            if j < right_len {
                j += 1;
            }
        }

        entries
    }

    fn push_pair(&self, entries: &mut Vec<DiffEntry>, left: usize, right: usize) {
        let (left_segment, right_segment) = (&self.left[left], &self.right[right]);
        match self.matches.fuzzy_similarity(left) {
            Some(similarity) => {
                entries.push(
                    DiffEntry::from_segment(ChangeKind::Removed, Side::Left, left_segment)
                        .with_similarity(similarity),
                );
                entries.push(
                    DiffEntry::from_segment(ChangeKind::Added, Side::Right, right_segment)
                        .with_similarity(similarity),
                );
            }
            None if self.include_unchanged => {
                entries.push(DiffEntry::from_segment(ChangeKind::Unchanged, Side::Left, left_segment));
                entries.push(DiffEntry::from_segment(ChangeKind::Unchanged, Side::Right, right_segment));
            }
            None => {}
        }
    }

    /// Every fuzzy pair with its texts and paragraphs
    pub fn fuzzy_pairs(&self) -> Vec<FuzzyPair> {
        self.matches
            .fuzzy_matches
            .iter()
            .map(|m| {
                let (l, r) = (&self.left[m.left_index], &self.right[m.right_index]);
                FuzzyPair {
                    left_index: m.left_index,
                    right_index: m.right_index,
                    left_text: l.text.clone(),
                    right_text: r.text.clone(),
                    left_paragraph: l.paragraph_index.unwrap_or(l.id),
                    right_paragraph: r.paragraph_index.unwrap_or(r.id),
                    similarity: m.similarity,
                }
            })
            .collect()
    }

    /// Word alignment for the given pairs
    pub fn word_diffs<I>(&self, pairs: I, lookahead: usize) -> Vec<WordDiffPair>
    where
        I: IntoIterator<Item = SegmentMatch>,
    {
        pairs
            .into_iter()
            .map(|m| WordDiffPair {
                left_index: m.left_index,
                right_index: m.right_index,
                similarity: m.similarity,
                changes: word_diff::word_diff(
                    &self.left[m.left_index].text,
                    &self.right[m.right_index].text,
                    lookahead,
                ),
            })
            .collect()
    }

    /// Character runs for every fuzzy pair
    pub fn character_diffs(&self) -> Vec<CharDiffPair> {
        self.matches
            .fuzzy_matches
            .iter()
            .map(|m| CharDiffPair {
                left_index: m.left_index,
                right_index: m.right_index,
                similarity: m.similarity,
                ops: char_diff::diff_chars(
                    &self.left[m.left_index].text,
                    &self.right[m.right_index].text,
                ),
            })
            .collect()
    }
}
