//! Durable collection storage.
//!
//! A store owns exactly one document holding an ordered collection of records
//! of a single type. Every operation works on the whole collection; there is
//! no partial update.

pub mod in_memory;
pub mod json_file;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

pub use in_memory::InMemoryCollectionStore;
pub use json_file::JsonFileStore;

/// Storage failures. Every variant names the document it concerns.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to initialize document {}: {source}", .path.display())]
    Init {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read document {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document {} is not a valid collection: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode collection for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write temporary document for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace document {}: {source}", .path.display())]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lock poisoned for document {}", .path.display())]
    Poisoned { path: PathBuf },
}

/// Whole-collection persistence for one record type.
///
/// Implementations serialize access per document: `retrieve` calls may run
/// concurrently with each other, while `save` and `modify` are exclusive.
pub trait CollectionStore<T>: Send + Sync {
    /// Load the full collection. A missing or empty document is an empty collection.
    fn retrieve(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the full collection. Readers observe either the previous or
    /// the new collection, never a mix.
    fn save(&self, items: &[T]) -> Result<(), StoreError>;

    /// Load, mutate and save while holding the write lock for the whole cycle.
    ///
    /// If `f` returns an error nothing is written.
    fn modify<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<StoreError>;
}

impl<T, S> CollectionStore<T> for Arc<S>
where
    S: CollectionStore<T>,
{
    fn retrieve(&self) -> Result<Vec<T>, StoreError> {
        (**self).retrieve()
    }

    fn save(&self, items: &[T]) -> Result<(), StoreError> {
        (**self).save(items)
    }

    fn modify<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<StoreError>,
    {
        (**self).modify(f)
    }
}
