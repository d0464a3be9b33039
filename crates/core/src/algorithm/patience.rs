use crate::algorithm::{AlgorithmMetadata, Comparison, MatchingAlgorithm};
use crate::config::{Category, CompareOptions};
use crate::diff::DiffResult;
use crate::error::Result;
use crate::matching::{greedy_fuzzy_pass, subsequence_exact_pass};
use crate::segmenter::TextSegmenter;
use crate::similarity::similarity;
use tracing::debug_span;

/// Patience-style matching
///
/// Exact pairs come from the longest common subsequence of segment texts, so
/// a moved block never steals anchors from the rest of the document. The
/// leftovers go through the same greedy fuzzy pass as [`SequentialAlgorithm`].
///
/// [`SequentialAlgorithm`]: crate::algorithm::SequentialAlgorithm
#[derive(Clone)]
pub struct PatienceAlgorithm {
    metadata: AlgorithmMetadata,
    segmenter: TextSegmenter,
}

impl PatienceAlgorithm {
    pub const NAME: &'static str = "patience";

    pub fn new(category: Category) -> Self {
        Self {
            metadata: AlgorithmMetadata::new(Self::NAME, "Patience", category, 2)
                .with_description("Longest common subsequence anchors with a greedy fuzzy pass"),
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

impl MatchingAlgorithm for PatienceAlgorithm {
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

        subsequence_exact_pass(&comparison.left, &comparison.right, &mut matches);
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
