use crate::algorithm::{AlgorithmMetadata, Comparison, MatchingAlgorithm};
use crate::config::{Category, CompareOptions};
use crate::diff::DiffResult;
use crate::error::Result;
use crate::matching::{greedy_fuzzy_pass, sequential_exact_pass};
use crate::segmenter::TextSegmenter;
use crate::similarity::similarity;
use tracing::debug_span;

/// Sequential matching ("thomas")
///
/// Forward-only exact pass followed by a greedy Jaccard fuzzy pass.
#[derive(Clone)]
pub struct SequentialAlgorithm {
    metadata: AlgorithmMetadata,
    segmenter: TextSegmenter,
}

impl SequentialAlgorithm {
    pub const NAME: &'static str = "thomas";

    pub fn new(category: Category) -> Self {
        Self {
            metadata: AlgorithmMetadata::new(Self::NAME, "Thomas", category, 1).with_description(
                "Sequential exact matching with a greedy word-overlap fuzzy pass",
            ),
            segmenter: TextSegmenter::new(),
        }
    }

    pub fn paragraphs() -> Self {
        Self::new(Category::Paragraph)
    }

    pub fn sentences() -> Self {
        Self::new(Category::Sentence)
    }

    pub fn with_segmenter(mut self, segmenter: TextSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }
}

impl MatchingAlgorithm for SequentialAlgorithm {
    fn metadata(&self) -> &AlgorithmMetadata {
        &self.metadata
    }

    fn compare(&self, left: &str, right: &str, options: &CompareOptions) -> Result<DiffResult> {
        let _span = debug_span!(
            "compare",
            algorithm = Self::NAME,
            granularity = %self.metadata.category
        )
        .entered();

        let comparison =
            Comparison::prepare(&self.segmenter, self.metadata.category, left, right, options)?;
        let mut matches = comparison.match_set();

        sequential_exact_pass(&comparison.left, &comparison.right, &mut matches);
        greedy_fuzzy_pass(
            &comparison.left,
            &comparison.right,
            &mut matches,
            comparison.threshold(),
            similarity,
        );

        let extensions = comparison.base_extensions(&matches);
        Ok(comparison.finish(&self.metadata, matches, extensions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeKind;

    #[test]
    fn test_identical_documents() {
        let text = "First paragraph.\n\nSecond paragraph.";
        let result = SequentialAlgorithm::paragraphs()
            .compare(text, text, &CompareOptions::default())
            .unwrap();

        assert!(result.diff.is_empty());
        assert_eq!(result.matches.exact_matches.len(), 2);
        assert!(result.matches.fuzzy_matches.is_empty());
        assert!(result.extensions.fuzzy_matched_pairs.is_empty());
        assert!(result.extensions.sentence_info.is_none());
    }

    #[test]
    fn test_fuzzy_pair_gets_word_diff() {
        let options = CompareOptions::new()
            .with_fuzziness(1.0)
            .with_match_range(0.3, 0.9);
        let result = SequentialAlgorithm::paragraphs()
            .compare("Foo bar.", "Foo baz.", &options)
            .unwrap();

        assert_eq!(result.matches.fuzzy_matches.len(), 1);
        assert_eq!(result.diff.len(), 2);
        assert_eq!(result.diff[0].kind, ChangeKind::Removed);
        assert_eq!(result.diff[1].kind, ChangeKind::Added);
        assert_eq!(result.extensions.word_diff.len(), 1);
        assert_eq!(result.extensions.word_diff[0].changes.len(), 3);
    }

    #[test]
    fn test_zero_fuzziness_uses_max_match() {
        // Jaccard 1/3 is well below the default max of 0.9
        let result = SequentialAlgorithm::paragraphs()
            .compare("Foo bar.", "Foo baz.", &CompareOptions::default())
            .unwrap();

        assert!(result.matches.fuzzy_matches.is_empty());
        assert_eq!(result.matches.unmatched_left.len(), 1);
        assert_eq!(result.matches.unmatched_right.len(), 1);
    }

    #[test]
    fn test_sentences_carry_sentence_info() {
        let result = SequentialAlgorithm::sentences()
            .compare("One. Two.", "One. Three.", &CompareOptions::default())
            .unwrap();

        assert_eq!(result.metadata.category, Category::Sentence);
        let info = result.extensions.sentence_info.unwrap();
        assert_eq!(info.left.len(), 2);
        assert_eq!(info.right.len(), 2);
        assert_eq!(result.matches.exact_matches.len(), 1);
    }

    #[test]
    fn test_metadata() {
        let algorithm = SequentialAlgorithm::sentences();
        assert_eq!(algorithm.metadata().name, "thomas");
        assert_eq!(algorithm.metadata().order, 1);
        assert!(algorithm.metadata().supports_fuzzy);
    }
}
