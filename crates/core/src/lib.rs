//! # Docmatch Core
//!
//! Structural correspondence between two versions of a document at paragraph
//! or sentence granularity. For each pair of texts the engine decides which
//! segments are unchanged, added, removed or edited versions of each other
//! (fuzzy matches), and returns a positioned diff plus word and character
//! detail for the edited pairs.
//!
//! ## Core Concepts
//!
//! - **Segmenter**: Splits text into paragraphs or sentences with byte offsets
//! - **Algorithms**: Pair segments (sequential, patience, word-level, character-level)
//! - **Registry**: Named algorithm instances per category, ordered for display
//! - **DiffEngine**: Resolves an algorithm by category and name and runs it
//!
//! ## Example
//!
//! ```rust
//! use docmatch_core::{CompareOptions, DiffEngine};
//!
//! let engine = DiffEngine::default();
//! let options = CompareOptions::new().with_fuzziness(0.5);
//! let result = engine
//!     .compare("sentence", "thomas", "One. Two.", "One. Three.", &options)
//!     .unwrap();
//! assert_eq!(result.matches.exact_matches.len(), 1);
//! ```

pub mod algorithm;
pub mod char_diff;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod matching;
pub mod registry;
pub mod segmenter;
pub mod similarity;
pub mod word_diff;

// Re-export main types
pub use algorithm::{
    AlgorithmMetadata, CharacterAlgorithm, LevenshteinAlgorithm, MatchingAlgorithm,
    PatienceAlgorithm, PendingAlgorithm, SequentialAlgorithm,
};
pub use config::{Category, CompareOptions};
pub use diff::{ChangeKind, DiffEntry, DiffResult, Extensions, Side};
pub use engine::DiffEngine;
pub use error::{MatchError, Result};
pub use matching::{MatchSet, SegmentMatch};
pub use registry::AlgorithmRegistry;
pub use segmenter::{Segment, TextSegmenter};
pub use similarity::similarity;

/// Compare two texts paragraph by paragraph with sequential matching
///
/// # Arguments
///
/// * `left` - The earlier version
/// * `right` - The later version
/// * `options` - Optional options (uses default if None)
///
/// # Errors
///
/// Returns [`MatchError::MalformedOptions`] for non-finite option values.
///
/// # Example
///
/// ```rust
/// use docmatch_core::compare;
///
/// let result = compare("Hello world.\nBye.", "Hello world.\nSee you.", None).unwrap();
/// println!("{}", result.summary());
/// ```
pub fn compare(left: &str, right: &str, options: Option<CompareOptions>) -> Result<DiffResult> {
    let options = options.unwrap_or_default();
    SequentialAlgorithm::paragraphs().compare(left, right, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_compare() {
        let result = compare("hello world\nkept", "hello rust\nkept", None).unwrap();
        assert_eq!(result.matches.exact_matches.len(), 1);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_with_fuzziness() {
        let options = CompareOptions::new().with_fuzziness(1.0);
        let result = compare("the quick brown fox", "the quick brown dog", Some(options)).unwrap();
        assert_eq!(result.matches.fuzzy_matches.len(), 1);
    }
}
