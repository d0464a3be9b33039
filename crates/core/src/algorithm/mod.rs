//! Segment matching algorithms
//!
//! Every algorithm implements [`MatchingAlgorithm`]. A concrete algorithm is
//! built for one granularity (paragraph or sentence) and registered under
//! that category by the host.
pub mod character;
pub mod levenshtein;
pub mod patience;
pub mod pending;
pub mod sequential;

pub use character::CharacterAlgorithm;
pub use levenshtein::LevenshteinAlgorithm;
pub use patience::PatienceAlgorithm;
pub use pending::PendingAlgorithm;
pub use sequential::SequentialAlgorithm;

use crate::config::{Category, CompareOptions};
use crate::diff::{DiffAssembler, DiffResult, Extensions, SentenceInfo};
use crate::error::{MatchError, Result};
use crate::mapping::ParagraphMap;
use crate::matching::MatchSet;
use crate::segmenter::{Segment, TextSegmenter};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Descriptive data the registry lists and sorts by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmMetadata {
    /// Unique per category
    pub name: String,
    pub display_name: String,
    pub category: Category,
    pub supports_fuzzy: bool,
    pub description: String,
    /// Display/priority rank, ascending
    pub order: i32,
}

impl AlgorithmMetadata {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        category: Category,
        order: i32,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            category,
            supports_fuzzy: true,
            description: String::new(),
            order,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_fuzzy(mut self, supports_fuzzy: bool) -> Self {
        self.supports_fuzzy = supports_fuzzy;
        self
    }

    /// Check the registration contract
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidAlgorithm`] for a blank name or display name,
    /// or a name containing whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MatchError::InvalidAlgorithm {
                reason: "metadata name is empty".to_string(),
            });
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(MatchError::InvalidAlgorithm {
                reason: format!("metadata name '{}' contains whitespace", self.name),
            });
        }
        if self.display_name.trim().is_empty() {
            return Err(MatchError::InvalidAlgorithm {
                reason: format!("algorithm '{}' has no display name", self.name),
            });
        }
        Ok(())
    }
}

/// Contract between the engine and the host
pub trait MatchingAlgorithm: Send + Sync {
    /// Metadata used for registration and listing
    fn metadata(&self) -> &AlgorithmMetadata;

    /// Compare two texts
    ///
    /// # Errors
    ///
    /// Fails fast with [`MatchError::MalformedOptions`] for unusable options or
    /// [`MatchError::NotImplemented`] for placeholder algorithms; never returns
    /// a partial result.
    fn compare(&self, left: &str, right: &str, options: &CompareOptions) -> Result<DiffResult>;
}

/// Working set of one comparison: segments of both sides plus normalized options
pub(crate) struct Comparison {
    pub category: Category,
    pub left: Vec<Segment>,
    pub right: Vec<Segment>,
    pub options: CompareOptions,
}

impl Comparison {
    pub fn prepare(
        segmenter: &TextSegmenter,
        category: Category,
        left: &str,
        right: &str,
        options: &CompareOptions,
    ) -> Result<Self> {
        let options = options.normalized()?;
        let left = segmenter.segments(
            category,
            left,
            ParagraphMap::new(&options.left_selected_paragraphs, &options.left_full_paragraphs),
        );
        let right = segmenter.segments(
            category,
            right,
            ParagraphMap::new(&options.right_selected_paragraphs, &options.right_full_paragraphs),
        );

        debug!(
            left_segments = left.len(),
            right_segments = right.len(),
            fuzziness = options.fuzziness,
            detector = segmenter.detector_name(),
            "segmented inputs"
        );

        Ok(Self {
            category,
            left,
            right,
            options,
        })
    }

    pub fn match_set(&self) -> MatchSet {
        MatchSet::new(self.left.len(), self.right.len())
    }

    pub fn threshold(&self) -> f64 {
        self.options.threshold()
    }

    pub fn assembler<'a>(&'a self, matches: &'a MatchSet) -> DiffAssembler<'a> {
        DiffAssembler::new(&self.left, &self.right, matches)
            .with_unchanged(self.options.include_unchanged)
    }

    /// Fuzzy pairs, their word alignment and (for sentences) sentence locations
    pub fn base_extensions(&self, matches: &MatchSet) -> Extensions {
        let assembler = self.assembler(matches);
        Extensions {
            fuzzy_matched_pairs: assembler.fuzzy_pairs(),
            word_diff: assembler.word_diffs(
                matches.fuzzy_matches.iter().copied(),
                self.options.word_lookahead,
            ),
            character_diff_pairs: Vec::new(),
            sentence_info: self.sentence_info(),
        }
    }

    fn sentence_info(&self) -> Option<SentenceInfo> {
        match self.category {
            Category::Paragraph => None,
            Category::Sentence => Some(SentenceInfo::locate(
                &self.left,
                &self.right,
                ParagraphMap::new(
                    &self.options.left_selected_paragraphs,
                    &self.options.left_full_paragraphs,
                ),
                ParagraphMap::new(
                    &self.options.right_selected_paragraphs,
                    &self.options.right_full_paragraphs,
                ),
            )),
        }
    }

    /// Assemble the diff entries and wrap everything into a result
    pub fn finish(
        self,
        metadata: &AlgorithmMetadata,
        matches: MatchSet,
        extensions: Extensions,
    ) -> DiffResult {
        debug_assert!(
            matches.check_invariants().is_ok(),
            "inconsistent match set: {:?}",
            matches.check_invariants()
        );

        let entries = self.assembler(&matches).entries();
        debug!(
            exact = matches.exact_matches.len(),
            fuzzy = matches.fuzzy_matches.len(),
            removed = matches.unmatched_left.len(),
            added = matches.unmatched_right.len(),
            entries = entries.len(),
            "comparison finished"
        );

        DiffResult::new(metadata.clone(), matches, entries, extensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_builder() {
        let metadata = AlgorithmMetadata::new("thomas", "Thomas", Category::Sentence, 1)
            .with_description("Sequential matching")
            .with_fuzzy(false);

        assert_eq!(metadata.category, Category::Sentence);
        assert!(!metadata.supports_fuzzy);
        assert!(metadata.validate().is_ok());
    }

    #[test]
    fn test_metadata_validation() {
        let blank = AlgorithmMetadata::new(" ", "Blank", Category::Paragraph, 1);
        assert_eq!(blank.validate().unwrap_err().code(), "ERR_INVALID_ALGORITHM");

        let spaced = AlgorithmMetadata::new("my algo", "Mine", Category::Paragraph, 1);
        assert!(spaced.validate().is_err());

        let unnamed = AlgorithmMetadata::new("mine", "", Category::Paragraph, 1);
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_prepare_normalizes_options() {
        let options = CompareOptions::new().with_fuzziness(4.0);
        let comparison = Comparison::prepare(
            &TextSegmenter::new(),
            Category::Paragraph,
            "a\n\nb",
            "b",
            &options,
        )
        .unwrap();

        assert_eq!(comparison.left.len(), 2);
        assert_eq!(comparison.right.len(), 1);
        assert_eq!(comparison.threshold(), 0.5);
        assert!(comparison.sentence_info().is_none());
    }

    #[test]
    fn test_prepare_rejects_nan() {
        let options = CompareOptions::new().with_fuzziness(f64::NAN);
        let result = Comparison::prepare(&TextSegmenter::new(), Category::Sentence, "a", "b", &options);
        assert!(matches!(result, Err(MatchError::MalformedOptions(_))));
    }
}
