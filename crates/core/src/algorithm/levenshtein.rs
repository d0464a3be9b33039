use crate::algorithm::{AlgorithmMetadata, Comparison, MatchingAlgorithm};
use crate::config::{Category, CompareOptions};
use crate::diff::DiffResult;
use crate::error::Result;
use crate::matching::{greedy_fuzzy_pass, sequential_exact_pass};
use crate::segmenter::TextSegmenter;
use crate::similarity::similarity;
use tracing::{debug, debug_span};

/// Word-level matching ("levenshtein")
///
/// Pairs segments exactly like [`SequentialAlgorithm`], then aligns every
/// matched pair word by word so the renderer can show intra-segment edits.
///
/// [`SequentialAlgorithm`]: crate::algorithm::SequentialAlgorithm
#[derive(Clone)]
pub struct LevenshteinAlgorithm {
    metadata: AlgorithmMetadata,
    segmenter: TextSegmenter,
}

impl LevenshteinAlgorithm {
    pub const NAME: &'static str = "levenshtein";

    pub fn new(category: Category) -> Self {
        Self {
            metadata: AlgorithmMetadata::new(Self::NAME, "Levenshtein", category, 3)
                .with_description("Sequential matching with word-level alignment of matched pairs"),
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

impl MatchingAlgorithm for LevenshteinAlgorithm {
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

        let mut extensions = comparison.base_extensions(&matches);
        extensions.word_diff = comparison
            .assembler(&matches)
            .word_diffs(matches.pairs(), comparison.options.word_lookahead);
        debug!(pairs = extensions.word_diff.len(), "aligned matched pairs by word");

        Ok(comparison.finish(&self.metadata, matches, extensions))
    }
}
