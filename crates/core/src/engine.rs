//! Diff engine that routes comparisons through the algorithm registry

use std::sync::Arc;

use tracing::debug;

use crate::config::{Category, CompareOptions};
use crate::diff::DiffResult;
use crate::error::{MatchError, Result};
use crate::registry::AlgorithmRegistry;

/// The main diff engine
///
/// Owns a populated registry and resolves `(category, name)` to an algorithm
/// for each comparison.
pub struct DiffEngine {
    registry: Arc<AlgorithmRegistry>,
}

impl DiffEngine {
    /// Create an engine over an already populated registry
    pub fn new(registry: AlgorithmRegistry) -> Self {
        Self::shared(Arc::new(registry))
    }

    /// Create an engine over a registry shared with other owners
    pub fn shared(registry: Arc<AlgorithmRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    /// Compare two texts with the named algorithm of a category
    ///
    /// # Errors
    ///
    /// - [`MatchError::InvalidCategory`] for an unknown category
    /// - [`MatchError::UnknownAlgorithm`] when nothing is registered under `name`
    /// - whatever the algorithm itself reports
    pub fn compare(
        &self,
        category: &str,
        name: &str,
        left: &str,
        right: &str,
        options: &CompareOptions,
    ) -> Result<DiffResult> {
        let parsed: Category = category.parse()?;
        let algorithm = self
            .registry
            .get(parsed.as_str(), name)
            .ok_or_else(|| MatchError::UnknownAlgorithm {
                category: parsed.to_string(),
                name: name.to_string(),
            })?;

        debug!(category = %parsed, algorithm = name, "dispatching comparison");
        algorithm.compare(left, right, options)
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(AlgorithmRegistry::with_defaults())
    }
}
