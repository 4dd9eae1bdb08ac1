use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{CollectionStore, StoreError};

/// File-backed collection store: one JSON array per document.
///
/// Saves go to a temporary file in the same directory which is synced and then
/// renamed over the document, so a crash mid-save leaves the previous version
/// in place.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: RwLock<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open (and if needed initialize) the document at `path`.
    ///
    /// The parent directory is created when missing. A missing, empty or
    /// unparseable document is reset to an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            lock: RwLock::new(()),
            _record: PhantomData,
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), StoreError> {
        let _guard = self.write_guard()?;

        if let Some(dir) = self.parent_dir() {
            fs::create_dir_all(dir).map_err(|source| StoreError::Init {
                path: self.path.clone(),
                source,
            })?;
        }

        match fs::read(&self.path) {
            Ok(bytes) if is_blank(&bytes) => {
                debug!(path = %self.path.display(), "document empty; initializing");
            }
            Ok(bytes) => match serde_json::from_slice::<Vec<T>>(&bytes) {
                Ok(_) => return Ok(()),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "document unreadable; resetting to empty collection");
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "document missing; initializing");
            }
            Err(source) => {
                return Err(StoreError::Init {
                    path: self.path.clone(),
                    source,
                });
            }
        }

        self.write_unlocked(&[])
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, ()>, StoreError> {
        self.lock.read().map_err(|_| StoreError::Poisoned {
            path: self.path.clone(),
        })
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, ()>, StoreError> {
        self.lock.write().map_err(|_| StoreError::Poisoned {
            path: self.path.clone(),
        })
    }

    fn read_unlocked(&self) -> Result<Vec<T>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if is_blank(&bytes) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn write_unlocked(&self, items: &[T]) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(items).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(&encoded).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        // On failure the temporary file is dropped (and removed) with the error.
        tmp.persist(&self.path).map_err(|e| StoreError::Commit {
            path: self.path.clone(),
            source: e.error,
        })?;

        sync_dir(dir);
        debug!(path = %self.path.display(), records = items.len(), "document saved");
        Ok(())
    }
}

impl<T> CollectionStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn retrieve(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.read_guard()?;
        self.read_unlocked()
    }

    fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let _guard = self.write_guard()?;
        self.write_unlocked(items)
    }

    fn modify<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<StoreError>,
    {
        let _guard = self.write_guard()?;
        let mut items = self.read_unlocked()?;
        let out = f(&mut items)?;
        self.write_unlocked(&items)?;
        Ok(out)
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Make the rename itself durable. Best effort: the document is already in place.
fn sync_dir(dir: &Path) {
    #[cfg(unix)]
    {
        if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
            debug!(dir = %dir.display(), error = %e, "directory sync failed");
        }
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
    }
}
