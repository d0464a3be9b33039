//! Configuration for comparisons

use crate::error::{MatchError, Result};
use crate::similarity::threshold_from_fuzziness;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Segment granularity, which is also the registry category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Line-based paragraphs
    Paragraph,
    /// Sentences within paragraphs
    Sentence,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Paragraph, Category::Sentence];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Paragraph => "paragraph",
            Category::Sentence => "sentence",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "paragraph" => Ok(Category::Paragraph),
            "sentence" => Ok(Category::Sentence),
            other => Err(MatchError::InvalidCategory(other.to_string())),
        }
    }
}

pub const DEFAULT_MIN_MATCH: f64 = 0.5;
pub const DEFAULT_MAX_MATCH: f64 = 0.9;
pub const DEFAULT_WORD_LOOKAHEAD: usize = 5;

/// Options recognized by every `compare()` call
///
/// Field names serialize in camelCase so hosts can hand over partial JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompareOptions {
    /// 0 = strict, 1 = loosest
    pub fuzziness: f64,

    /// Threshold reached at fuzziness 1
    pub min_match: f64,

    /// Threshold reached at fuzziness 0
    pub max_match: f64,

    /// Whole-document indices of the paragraphs making up the left text
    pub left_selected_paragraphs: Vec<usize>,

    /// Whole-document indices of the paragraphs making up the right text
    pub right_selected_paragraphs: Vec<usize>,

    /// Full paragraph texts of the left document
    pub left_full_paragraphs: Vec<String>,

    /// Full paragraph texts of the right document
    pub right_full_paragraphs: Vec<String>,

    /// Resync window for word-level alignment
    pub word_lookahead: usize,

    /// Emit `Unchanged` entries for exact matches
    pub include_unchanged: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CompareOptions {
    /// Create strict default options
    pub fn new() -> Self {
        Self {
            fuzziness: 0.0,
            min_match: DEFAULT_MIN_MATCH,
            max_match: DEFAULT_MAX_MATCH,
            left_selected_paragraphs: Vec::new(),
            right_selected_paragraphs: Vec::new(),
            left_full_paragraphs: Vec::new(),
            right_full_paragraphs: Vec::new(),
            word_lookahead: DEFAULT_WORD_LOOKAHEAD,
            include_unchanged: false,
        }
    }

    pub fn with_fuzziness(mut self, fuzziness: f64) -> Self {
        self.fuzziness = fuzziness;
        self
    }

    pub fn with_match_range(mut self, min_match: f64, max_match: f64) -> Self {
        self.min_match = min_match;
        self.max_match = max_match;
        self
    }

    pub fn with_left_paragraphs(mut self, selected: Vec<usize>, full: Vec<String>) -> Self {
        self.left_selected_paragraphs = selected;
        self.left_full_paragraphs = full;
        self
    }

    pub fn with_right_paragraphs(mut self, selected: Vec<usize>, full: Vec<String>) -> Self {
        self.right_selected_paragraphs = selected;
        self.right_full_paragraphs = full;
        self
    }

    pub fn with_word_lookahead(mut self, lookahead: usize) -> Self {
        self.word_lookahead = lookahead;
        self
    }

    pub fn with_unchanged(mut self, include: bool) -> Self {
        self.include_unchanged = include;
        self
    }

    /// Reject values that cannot be clamped into shape
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MalformedOptions`] when a numeric field is NaN or infinite.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("fuzziness", self.fuzziness),
            ("minMatch", self.min_match),
            ("maxMatch", self.max_match),
        ] {
            if !value.is_finite() {
                return Err(MatchError::MalformedOptions(format!(
                    "{field} must be a finite number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Validate, then clamp everything into range
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MalformedOptions`] when [`validate`](Self::validate) fails.
    pub fn normalized(&self) -> Result<Self> {
        self.validate()?;
        let mut options = self.clone();

        options.fuzziness = clamp_unit("fuzziness", options.fuzziness);
        options.min_match = clamp_unit("minMatch", options.min_match);
        options.max_match = clamp_unit("maxMatch", options.max_match);

        if options.min_match > options.max_match {
            warn!(
                min_match = options.min_match,
                max_match = options.max_match,
                "minMatch exceeds maxMatch, swapping"
            );
            std::mem::swap(&mut options.min_match, &mut options.max_match);
        }

        if options.word_lookahead == 0 {
            warn!("wordLookahead of 0 raised to 1");
            options.word_lookahead = 1;
        }

        Ok(options)
    }

    /// Similarity threshold implied by these options
    pub fn threshold(&self) -> f64 {
        threshold_from_fuzziness(self.fuzziness, self.min_match, self.max_match)
    }
}

fn clamp_unit(field: &str, value: f64) -> f64 {
    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        warn!(field, value, clamped, "option clamped into [0, 1]");
    }
    clamped
}
