//! Text segmentation
//!
//! Splits raw text into paragraphs (line based) or sentences (pluggable
//! detector with a regex fallback) while recording byte offsets into the
//! source text.

use crate::config::Category;
use crate::error::Result;
use crate::mapping::{locate_from, ByteSpan, ParagraphMap};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

/// A contiguous slice of source text
///
/// `end - start == text.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Position in the segment sequence, stable for the whole comparison
    pub id: usize,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub paragraph_index: Option<usize>,
}

impl Segment {
    pub fn new(id: usize, text: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        let end = start + text.len();
        Self {
            id,
            text,
            start,
            end,
            paragraph_index: None,
        }
    }

    pub fn with_paragraph(mut self, paragraph_index: usize) -> Self {
        self.paragraph_index = Some(paragraph_index);
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Pluggable sentence boundary detection
pub trait SentenceDetector: Send + Sync {
    /// Split `text` into raw sentence strings
    ///
    /// # Errors
    ///
    /// Implementations return [`MatchError::Segmentation`](crate::error::MatchError::Segmentation) when they cannot
    /// process the text; the segmenter then falls back to the regex rule.
    fn detect(&self, text: &str) -> Result<Vec<String>>;

    /// Get the name of this detector
    fn name(&self) -> &str;

    /// Clone this detector into a Box
    fn clone_box(&self) -> Box<dyn SentenceDetector>;
}

impl Clone for Box<dyn SentenceDetector> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// UAX #29 sentence boundaries
#[derive(Debug, Clone, Default)]
pub struct UnicodeSentenceDetector;

impl SentenceDetector for UnicodeSentenceDetector {
    fn detect(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.unicode_sentences().map(str::to_string).collect())
    }

    fn name(&self) -> &str {
        "unicode"
    }

    fn clone_box(&self) -> Box<dyn SentenceDetector> {
        Box::new(self.clone())
    }
}

static SENTENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn sentence_regex() -> &'static Regex {
    SENTENCE_REGEX.get_or_init(|| {
        // A run of non-terminators closed by one or more of . ! ?
        Regex::new(r"[^.!?]+[.!?]+").expect("Failed to compile sentence regex")
    })
}

/// Terminator-based rule; text after the last terminator is not a sentence
#[derive(Debug, Clone, Default)]
pub struct RegexSentenceDetector;

impl SentenceDetector for RegexSentenceDetector {
    fn detect(&self, text: &str) -> Result<Vec<String>> {
        Ok(sentence_regex()
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect())
    }

    fn name(&self) -> &str {
        "regex"
    }

    fn clone_box(&self) -> Box<dyn SentenceDetector> {
        Box::new(self.clone())
    }
}

/// Splits texts into paragraph or sentence segments
#[derive(Clone)]
pub struct TextSegmenter {
    detector: Box<dyn SentenceDetector>,
    fallback: RegexSentenceDetector,
}

impl Default for TextSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSegmenter {
    pub fn new() -> Self {
        Self::with_detector(Box::new(UnicodeSentenceDetector))
    }

    pub fn with_detector(detector: Box<dyn SentenceDetector>) -> Self {
        Self {
            detector,
            fallback: RegexSentenceDetector,
        }
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    /// Split on line terminators (`\r\n`, `\r`, `\n`)
    ///
    /// Empty lines are kept so indices line up with line numbers. Offsets
    /// refer to `text` itself; terminators are excluded from segment text.
    pub fn split_paragraphs(&self, text: &str) -> Vec<Segment> {
        let bytes = text.as_bytes();
        let mut segments = Vec::new();
        let mut start = 0;
        let mut i = 0;

        let push = |segments: &mut Vec<Segment>, start: usize, end: usize| {
            let index = segments.len();
            segments.push(Segment::new(index, &text[start..end], start).with_paragraph(index));
        };

        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    push(&mut segments, start, i);
                    i += 1;
                    start = i;
                }
                b'\r' => {
                    push(&mut segments, start, i);
                    i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    start = i;
                }
                _ => i += 1,
            }
        }
        push(&mut segments, start, bytes.len());

        segments
    }

    /// Split into trimmed, non-empty sentences with recovered offsets
    pub fn split_sentences(&self, text: &str) -> Vec<Segment> {
        let raw = match self.detector.detect(text) {
            Ok(sentences) if sentences.iter().any(|s| !s.trim().is_empty()) => sentences,
            Ok(_) => {
                debug!(detector = self.detector.name(), "no sentences found, using regex fallback");
                self.fallback_sentences(text)
            }
            Err(err) => {
                debug!(detector = self.detector.name(), error = %err, "sentence detector failed, using regex fallback");
                self.fallback_sentences(text)
            }
        };

        // Detectors keep trailing whitespace on all but the last sentence
        let mut seen = HashSet::new();
        let mut sentences: Vec<&str> = raw
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && seen.insert(*s))
            .collect();

        if sentences.is_empty() && !text.trim().is_empty() {
            sentences.push(text.trim());
        }

        let mut cursor = 0;
        sentences
            .into_iter()
            .enumerate()
            .map(|(id, sentence)| {
                let span = locate_from(text, sentence, cursor)
                    .unwrap_or_else(|| ByteSpan::new(cursor, cursor + sentence.len()));
                cursor = span.end;
                Segment::new(id, sentence, span.start)
            })
            .collect()
    }

    fn fallback_sentences(&self, text: &str) -> Vec<String> {
        self.fallback.detect(text).unwrap_or_default()
    }

    /// Segment a compared text for matching
    ///
    /// Blank paragraphs are dropped. `paragraph_index` is mapped through
    /// `map`, offsets stay in `text` coordinates and ids are renumbered
    /// densely over the returned sequence.
    pub fn segments(&self, category: Category, text: &str, map: ParagraphMap<'_>) -> Vec<Segment> {
        let paragraphs = self
            .split_paragraphs(text)
            .into_iter()
            .filter(|p| !p.is_blank())
            .enumerate();

        let mut segments = Vec::new();
        for (ordinal, paragraph) in paragraphs {
            let line_index = paragraph.paragraph_index.unwrap_or(paragraph.id);
            let paragraph_index = map.paragraph_index(ordinal, line_index);

            match category {
                Category::Paragraph => {
                    segments.push(
                        Segment::new(segments.len(), paragraph.text, paragraph.start)
                            .with_paragraph(paragraph_index),
                    );
                }
                Category::Sentence => {
                    for sentence in self.split_sentences(&paragraph.text) {
                        segments.push(
                            Segment::new(segments.len(), sentence.text, paragraph.start + sentence.start)
                                .with_paragraph(paragraph_index),
                        );
                    }
                }
            }
        }

        segments
    }
}

/// Detector that always fails, for exercising the fallback path
#[cfg(test)]
#[derive(Clone)]
pub(crate) struct FailingDetector;

#[cfg(test)]
impl SentenceDetector for FailingDetector {
    fn detect(&self, _text: &str) -> Result<Vec<String>> {
        Err(crate::error::MatchError::Segmentation("model unavailable".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn clone_box(&self) -> Box<dyn SentenceDetector> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_paragraphs_keep_empty_lines() {
        let segmenter = TextSegmenter::new();
        let segments = segmenter.split_paragraphs("one\n\ntwo\n");

        assert_eq!(texts(&segments), vec!["one", "", "two", ""]);
        assert_eq!(segments[2].start, 5);
        assert_eq!(segments[2].paragraph_index, Some(2));
    }

    #[test]
    fn test_paragraph_line_endings() {
        let segmenter = TextSegmenter::new();
        let text = "a\r\nbb\rccc\nd";
        let segments = segmenter.split_paragraphs(text);

        assert_eq!(texts(&segments), vec!["a", "bb", "ccc", "d"]);
        for segment in &segments {
            assert_eq!(&text[segment.start..segment.end], segment.text);
        }
    }

    #[test]
    fn test_empty_text_is_one_empty_paragraph() {
        let segments = TextSegmenter::new().split_paragraphs("");
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_blank());
    }

    #[test]
    fn test_sentences_with_offsets() {
        let segmenter = TextSegmenter::new();
        let text = "Hello world. Foo bar! Is it?";
        let segments = segmenter.split_sentences(text);

        assert_eq!(texts(&segments), vec!["Hello world.", "Foo bar!", "Is it?"]);
        for segment in &segments {
            assert_eq!(&text[segment.start..segment.end], segment.text);
        }
    }

    #[test]
    fn test_repeated_sentence_keeps_first_occurrence() {
        let segmenter = TextSegmenter::new();

        let trailing = segmenter.split_sentences("Yes. No. Yes.");
        assert_eq!(texts(&trailing), vec!["Yes.", "No."]);
        assert_eq!(trailing.iter().map(|s| s.start).collect::<Vec<_>>(), vec![0, 5]);

        let inner = segmenter.split_sentences("Yes. No. Yes. Maybe.");
        assert_eq!(texts(&inner), vec!["Yes.", "No.", "Maybe."]);
        assert_eq!(inner[2].start, 14);
    }

    #[test]
    fn test_fallback_dedupes_trimmed_text() {
        let segmenter = TextSegmenter::with_detector(Box::new(FailingDetector));
        let segments = segmenter.split_sentences("Go! Stop. Go!");
        assert_eq!(texts(&segments), vec!["Go!", "Stop."]);
    }

    #[test]
    fn test_fallback_when_detector_fails() {
        let segmenter = TextSegmenter::with_detector(Box::new(FailingDetector));
        let segments = segmenter.split_sentences("First one. Second one?");
        assert_eq!(texts(&segments), vec!["First one.", "Second one?"]);
        assert_eq!(segments[1].start, 11);
    }

    #[test]
    fn test_unterminated_text_is_single_segment() {
        let segmenter = TextSegmenter::with_detector(Box::new(FailingDetector));
        let segments = segmenter.split_sentences("  no terminator here  ");
        assert_eq!(texts(&segments), vec!["no terminator here"]);
        assert_eq!(segments[0].start, 2);

        assert!(segmenter.split_sentences("   ").is_empty());
    }

    #[test]
    fn test_regex_detector_drops_trailing_fragment() {
        let sentences = RegexSentenceDetector.detect("One. Two?! tail").unwrap();
        assert_eq!(sentences, vec!["One.".to_string(), " Two?!".to_string()]);
    }

    #[test]
    fn test_segments_by_paragraph_skip_blanks() {
        let segmenter = TextSegmenter::new();
        let segments = segmenter.segments(Category::Paragraph, "a\n\n  \nb", ParagraphMap::default());

        assert_eq!(texts(&segments), vec!["a", "b"]);
        assert_eq!(segments[1].id, 1);
        assert_eq!(segments[1].paragraph_index, Some(3));
        assert_eq!(segments[1].start, 6);
    }

    #[test]
    fn test_segments_by_sentence_map_paragraphs() {
        let segmenter = TextSegmenter::new();
        let selected = [4, 7];
        let text = "One. Two.\n\nThree.";
        let segments = segmenter.segments(Category::Sentence, text, ParagraphMap::new(&selected, &[]));

        assert_eq!(texts(&segments), vec!["One.", "Two.", "Three."]);
        let paragraphs: Vec<Option<usize>> = segments.iter().map(|s| s.paragraph_index).collect();
        assert_eq!(paragraphs, vec![Some(4), Some(4), Some(7)]);
        assert_eq!(segments[2].start, 11);
        assert_eq!(&text[segments[2].start..segments[2].end], "Three.");
    }
}
