use crate::algorithm::{AlgorithmMetadata, Comparison, MatchingAlgorithm};
use crate::config::{Category, CompareOptions};
use crate::diff::DiffResult;
use crate::error::Result;
use crate::matching::{greedy_fuzzy_pass, sequential_exact_pass};
use crate::segmenter::TextSegmenter;
use crate::similarity::character_similarity;
use tracing::{debug, debug_span};

/// Acceptance threshold of the character-level fuzzy pass
pub const CHARACTER_THRESHOLD: f64 = 0.1;

/// Character-level matching
///
/// Leftover segments are paired by the share of characters a char diff keeps
/// in common, with a fixed low threshold, so almost every segment ends up in
/// a pair with its own character operations. The fuzziness options are
/// ignored.
#[derive(Clone)]
pub struct CharacterAlgorithm {
    metadata: AlgorithmMetadata,
    segmenter: TextSegmenter,
}

impl CharacterAlgorithm {
    pub const NAME: &'static str = "character";

    pub fn new(category: Category) -> Self {
        Self {
            metadata: AlgorithmMetadata::new(Self::NAME, "Character", category, 4)
                .with_description("Character-level pairing with per-pair character operations")
                .with_fuzzy(false),
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

impl MatchingAlgorithm for CharacterAlgorithm {
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
            CHARACTER_THRESHOLD,
            character_similarity,
        );

        let mut extensions = comparison.base_extensions(&matches);
        extensions.character_diff_pairs = comparison.assembler(&matches).character_diffs();
        debug!(
            pairs = extensions.character_diff_pairs.len(),
            "computed character operations"
        );

        Ok(comparison.finish(&self.metadata, matches, extensions))
    }
}
