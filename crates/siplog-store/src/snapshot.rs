//! Durable snapshot storage for record collections.
//!
//! A snapshot store holds exactly one serialized copy of a domain's full
//! collection, a JSON array of records, and overwrites it wholesale on
//! every save. There are no partial or incremental writes.
//!
//! Loading is fail-open: a missing, unreadable, or corrupt snapshot yields
//! an empty collection so the owning store stays usable. Saving is atomic:
//! the bytes land in a temp file that is renamed over the snapshot, so a
//! concurrent or later load never observes a truncated file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Error, Result};

/// Durable byte-level storage of one full-collection snapshot.
pub trait SnapshotStore<R>: Send + Sync {
    /// Read and deserialize the snapshot.
    ///
    /// Missing data, decode failures, and corruption all yield an empty
    /// collection rather than an error.
    fn load(&self) -> Vec<R>;

    /// Serialize the full collection and write it atomically.
    ///
    /// Errors are returned so the caller can stay dirty and retry later;
    /// a failed save never corrupts a previously written snapshot.
    fn save(&self, records: &[R]) -> Result<()>;

    /// Remove the persisted snapshot entirely. Missing snapshots are fine.
    fn clear(&self) -> Result<()>;
}

impl<R, S> SnapshotStore<R> for std::sync::Arc<S>
where
    S: SnapshotStore<R> + ?Sized,
{
    fn load(&self) -> Vec<R> {
        (**self).load()
    }

    fn save(&self, records: &[R]) -> Result<()> {
        (**self).save(records)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// File-backed snapshot store: one JSON array per domain.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    /// Create a snapshot store at the given path.
    ///
    /// Parent directories are created lazily on the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

impl<R> SnapshotStore<R> for JsonFileSnapshot
where
    R: Serialize + DeserializeOwned + Send + Sync,
{
    fn load(&self) -> Vec<R> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!("failed to read snapshot {}: {}", self.path.display(), err);
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "corrupt snapshot {}: {}; starting empty",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn save(&self, records: &[R]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|err| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: err,
                })?;
            }
        }

        let bytes = serde_json::to_vec(records)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory snapshot store.
///
/// The preference-store analog of [`JsonFileSnapshot`] and the test double
/// for the store: it keeps the serialized bytes in a cell, counts saves,
/// and lets tests plant arbitrary bytes to exercise the fail-open path.
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    bytes: Mutex<Option<Vec<u8>>>,
    saves: AtomicUsize,
}

impl MemorySnapshot {
    /// Create an empty in-memory snapshot store.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many saves have completed.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The raw persisted bytes, if any.
    pub fn raw(&self) -> Option<Vec<u8>> {
        self.cell().clone()
    }

    /// Replace the persisted bytes wholesale.
    pub fn set_raw(&self, bytes: impl Into<Vec<u8>>) {
        *self.cell() = Some(bytes.into());
    }

    fn cell(&self) -> std::sync::MutexGuard<'_, Option<Vec<u8>>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R> SnapshotStore<R> for MemorySnapshot
where
    R: Serialize + DeserializeOwned + Send + Sync,
{
    fn load(&self) -> Vec<R> {
        let Some(bytes) = self.cell().clone() else {
            return Vec::new();
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(err) => {
                warn!("corrupt in-memory snapshot: {}; starting empty", err);
                Vec::new()
            }
        }
    }

    fn save(&self, records: &[R]) -> Result<()> {
        let bytes = serde_json::to_vec(records)?;
        *self.cell() = Some(bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.cell() = None;
        Ok(())
    }
}
