use crate::algorithm::{AlgorithmMetadata, MatchingAlgorithm};
use crate::config::{Category, CompareOptions};
use crate::diff::DiffResult;
use crate::error::{MatchError, Result};
use tracing::warn;

/// Registrable placeholder whose comparison is not available yet
///
/// Lets a host list an algorithm before it ships; every `compare` call fails
/// with [`MatchError::NotImplemented`].
#[derive(Debug, Clone)]
pub struct PendingAlgorithm {
    metadata: AlgorithmMetadata,
}

impl PendingAlgorithm {
    pub fn new(metadata: AlgorithmMetadata) -> Self {
        Self { metadata }
    }

    pub fn named(name: &str, display_name: &str, category: Category, order: i32) -> Self {
        Self::new(
            AlgorithmMetadata::new(name, display_name, category, order)
                .with_description("Not implemented yet"),
        )
    }
}

impl MatchingAlgorithm for PendingAlgorithm {
    fn metadata(&self) -> &AlgorithmMetadata {
        &self.metadata
    }

    fn compare(&self, _left: &str, _right: &str, _options: &CompareOptions) -> Result<DiffResult> {
        warn!(algorithm = %self.metadata.name, "compare called on a pending algorithm");
        Err(MatchError::NotImplemented {
            name: self.metadata.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_fails() {
        let pending = PendingAlgorithm::named("semantic", "Semantic", Category::Sentence, 9);
        let err = pending
            .compare("a", "b", &CompareOptions::default())
            .unwrap_err();

        assert_eq!(err, MatchError::NotImplemented { name: "semantic".to_string() });
        assert_eq!(err.code(), "ERR_NOT_IMPLEMENTED");
        assert_eq!(pending.metadata().order, 9);
    }
}
