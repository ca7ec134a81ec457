use std::collections::HashSet;
use std::hash::Hash;

use crate::domain::errors::DomainError;

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Resolves an association for a whole page at once: the distinct parent
/// keys are split into chunks of `batch_size` and each chunk is fetched with
/// a single `IN (...)` style call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLoader {
    batch_size: usize,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl BatchLoader {
    pub fn new(batch_size: usize) -> Result<Self, DomainError> {
        if batch_size == 0 {
            return Err(DomainError::InvalidInput(
                "batch size must be at least 1".into(),
            ));
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of fetch calls `load` makes for `distinct_keys` keys.
    pub fn batches_for(&self, distinct_keys: usize) -> usize {
        distinct_keys.div_ceil(self.batch_size)
    }

    /// Calls `fetch` once per chunk of distinct keys, in first-seen key
    /// order, and concatenates the results. No call is made for an empty key
    /// set.
    pub fn load<K, V, I, F>(&self, keys: I, mut fetch: F) -> Result<Vec<V>, DomainError>
    where
        K: Eq + Hash + Copy,
        I: IntoIterator<Item = K>,
        F: FnMut(&[K]) -> Result<Vec<V>, DomainError>,
    {
        let mut seen = HashSet::new();
        let distinct: Vec<K> = keys.into_iter().filter(|k| seen.insert(*k)).collect();

        let mut out = Vec::new();
        for chunk in distinct.chunks(self.batch_size) {
            out.extend(fetch(chunk)?);
        }
        Ok(out)
    }
}
