//! Algorithm registry
//!
//! `AlgorithmRegistry` holds one name-keyed table per category. The host
//! populates it once at startup; afterwards it is only read, so a populated
//! registry can be shared behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::algorithm::{
    AlgorithmMetadata, CharacterAlgorithm, LevenshteinAlgorithm, MatchingAlgorithm,
    PatienceAlgorithm, SequentialAlgorithm,
};
use crate::config::Category;
use crate::error::{MatchError, Result};

struct Registration {
    /// Position of the first registration under this name; breaks order ties
    seq: u64,
    algorithm: Arc<dyn MatchingAlgorithm>,
}

/// Named algorithm instances per category, listed by ascending `order`
#[derive(Default)]
pub struct AlgorithmRegistry {
    paragraph: HashMap<String, Registration>,
    sentence: HashMap<String, Registration>,
    next_seq: u64,
}

impl AlgorithmRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four built-in algorithms in both categories
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for category in Category::ALL {
            let algorithms: [Arc<dyn MatchingAlgorithm>; 4] = [
                Arc::new(SequentialAlgorithm::new(category)),
                Arc::new(PatienceAlgorithm::new(category)),
                Arc::new(LevenshteinAlgorithm::new(category)),
                Arc::new(CharacterAlgorithm::new(category)),
            ];
            for algorithm in algorithms {
                registry.insert(category, algorithm);
            }
        }
        registry
    }

    fn table(&self, category: Category) -> &HashMap<String, Registration> {
        match category {
            Category::Paragraph => &self.paragraph,
            Category::Sentence => &self.sentence,
        }
    }

    fn table_mut(&mut self, category: Category) -> &mut HashMap<String, Registration> {
        match category {
            Category::Paragraph => &mut self.paragraph,
            Category::Sentence => &mut self.sentence,
        }
    }

    /// Register `algorithm` under `category`, replacing any algorithm of the same name
    ///
    /// # Errors
    ///
    /// - [`MatchError::InvalidCategory`] when `category` is not `paragraph` or `sentence`
    /// - [`MatchError::InvalidAlgorithm`] when the metadata is incomplete or the
    ///   algorithm was built for the other category
    pub fn register(&mut self, category: &str, algorithm: Arc<dyn MatchingAlgorithm>) -> Result<()> {
        let category: Category = category.parse().inspect_err(|e| {
            warn!(error = %e, "rejected algorithm registration");
        })?;
        self.register_for(category, algorithm)
    }

    /// Typed form of [`register`](Self::register)
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidAlgorithm`] when the metadata is incomplete
    /// or names the other category.
    pub fn register_for(
        &mut self,
        category: Category,
        algorithm: Arc<dyn MatchingAlgorithm>,
    ) -> Result<()> {
        let metadata = algorithm.metadata();
        let checked = metadata.validate().and_then(|()| {
            if metadata.category == category {
                Ok(())
            } else {
                Err(MatchError::InvalidAlgorithm {
                    reason: format!(
                        "algorithm '{}' is built for {} segments, not {}",
                        metadata.name, metadata.category, category
                    ),
                })
            }
        });
        if let Err(e) = checked {
            warn!(%category, error = %e, "rejected algorithm registration");
            return Err(e);
        }

        self.insert(category, algorithm);
        Ok(())
    }

    fn insert(&mut self, category: Category, algorithm: Arc<dyn MatchingAlgorithm>) {
        let name = algorithm.metadata().name.clone();
        let seq = self.next_seq;
        self.next_seq += 1;

        let table = self.table_mut(category);
        match table.get_mut(&name) {
            Some(existing) => {
                warn!(%category, algorithm = %name, "replacing registered algorithm");
                existing.algorithm = algorithm;
            }
            None => {
                debug!(%category, algorithm = %name, "registered algorithm");
                table.insert(name, Registration { seq, algorithm });
            }
        }
    }

    /// Look up an algorithm; `None` for an unknown category or name
    pub fn get(&self, category: &str, name: &str) -> Option<Arc<dyn MatchingAlgorithm>> {
        let category: Category = category.parse().ok()?;
        self.table(category)
            .get(name)
            .map(|registration| Arc::clone(&registration.algorithm))
    }

    /// All algorithms of a category sorted by ascending `order`
    ///
    /// Equal orders keep registration order. Unknown categories yield an empty list.
    pub fn get_all(&self, category: &str) -> Vec<Arc<dyn MatchingAlgorithm>> {
        let Ok(category) = category.parse::<Category>() else {
            return Vec::new();
        };

        let mut registrations: Vec<&Registration> = self.table(category).values().collect();
        registrations.sort_by_key(|r| (r.algorithm.metadata().order, r.seq));
        registrations
            .into_iter()
            .map(|r| Arc::clone(&r.algorithm))
            .collect()
    }

    /// Metadata of [`get_all`](Self::get_all), same order
    pub fn get_metadata(&self, category: &str) -> Vec<AlgorithmMetadata> {
        self.get_all(category)
            .iter()
            .map(|algorithm| algorithm.metadata().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.paragraph.len() + self.sentence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
