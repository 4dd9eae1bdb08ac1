use std::path::PathBuf;
use std::sync::RwLock;

use super::{CollectionStore, StoreError};

/// In-memory collection store for tests/dev.
#[derive(Debug)]
pub struct InMemoryCollectionStore<T> {
    items: RwLock<Vec<T>>,
}

impl<T> InMemoryCollectionStore<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Poisoned {
            path: PathBuf::from("<memory>"),
        }
    }
}

impl<T> Default for InMemoryCollectionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectionStore<T> for InMemoryCollectionStore<T>
where
    T: Clone + Send + Sync,
{
    fn retrieve(&self) -> Result<Vec<T>, StoreError> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.clone())
    }

    fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let mut current = self.items.write().map_err(|_| Self::poisoned())?;
        *current = items.to_vec();
        Ok(())
    }

    fn modify<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut current = self.items.write().map_err(|_| Self::poisoned())?;

        // Mutate a working copy so a failed closure leaves the collection untouched.
        let mut working = current.clone();
        let out = f(&mut working)?;
        *current = working;
        Ok(out)
    }
}
