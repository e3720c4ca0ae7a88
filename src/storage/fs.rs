//! Durable filesystem object storage backend.
//!
//! One file per key under a root directory, each blob framed by the
//! codec in [`crate::storage::codec`]. Writes go to a uuid-suffixed
//! temporary file and are atomically renamed into place, so a reader
//! never observes a partially written snapshot even across a crash.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::StoreError;
use crate::storage::codec::{decode_frame, encode_frame};
use crate::storage::traits::ObjectStore;

/// Configuration for the filesystem backend.
#[derive(Debug, Clone)]
pub struct FsStoreConfig {
    /// Whether to fsync data and directory on every write (slower but safer).
    pub sync_on_write: bool,
}

impl Default for FsStoreConfig {
    fn default() -> Self {
        Self { sync_on_write: true }
    }
}

/// Filesystem-backed [`ObjectStore`].
///
/// Keys follow the snapshot path convention
/// (`{prefix}/{device}/previous_routes`) and map directly to a relative
/// path below the root, so other tooling can locate snapshot files.
#[derive(Debug)]
pub struct FsObjectStore {
    root: PathBuf,
    config: FsStoreConfig,
}

impl FsObjectStore {
    /// Opens (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the root directory cannot be created.
    pub fn open(root: impl AsRef<Path>, config: FsStoreConfig) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root, config })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        // Keys are storage identifiers, not arbitrary paths.
        let valid = !key.is_empty()
            && !key.starts_with('/')
            && key.split('/').all(|seg| !seg.is_empty() && seg != "." && seg != "..");
        if !valid {
            return Err(StoreError::Backend {
                key: key.to_string(),
                message: "invalid object key".to_string(),
            });
        }
        Ok(self.root.join(key))
    }

    fn io_err(key: &str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;

        let mut file = match File::open(&path) {
            Ok(file) => file,
            // Never-written is the expected first-run state, not a failure.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_err(key, e)),
        };

        let mut framed = Vec::new();
        file.read_to_end(&mut framed)
            .map_err(|e| Self::io_err(key, e))?;

        decode_frame(&framed).map(Some).map_err(|e| StoreError::Corrupted {
            key: key.to_string(),
            detail: e.to_string(),
        })
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let final_path = self.path_for(key)?;
        let parent = final_path.parent().ok_or_else(|| StoreError::Backend {
            key: key.to_string(),
            message: "object key has no parent directory".to_string(),
        })?;
        fs::create_dir_all(parent).map_err(|e| Self::io_err(key, e))?;

        let framed = encode_frame(bytes).map_err(|e| StoreError::Serialize {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        // Write-to-temp-then-rename for crash safety.
        let temp_path = final_path.with_extension(format!("tmp.{}", Uuid::new_v4()));
        let result = (|| {
            let mut file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)?;
            file.write_all(&framed)?;
            if self.config.sync_on_write {
                file.sync_all()?;
            }
            drop(file);

            fs::rename(&temp_path, &final_path)?;

            if self.config.sync_on_write {
                // Persist the rename itself.
                if let Ok(dir) = File::open(parent) {
                    let _ = dir.sync_all();
                }
            }
            Ok(())
        })();

        result.map_err(|e: std::io::Error| {
            let _ = fs::remove_file(&temp_path);
            Self::io_err(key, e)
        })
    }
}
