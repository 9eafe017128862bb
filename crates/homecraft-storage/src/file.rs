//! # Filesystem-backed store
//!
//! [`FileStore`] keeps each key in its own file under a base directory so
//! the cart and session survive restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── token        # raw bearer token
//! ├── user         # JSON user record
//! └── cartItems    # JSON list of cart lines
//! ```
//!
//! ## Default location
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.local/share/homecraft/` |
//! | macOS | `~/Library/Application Support/com.homecraft.homecraft/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\homecraft\homecraft\data\` |
//!
//! Writes go to a temporary sibling first and are renamed into place, so
//! a crash mid-write leaves the previous value intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::{KeyValueStore, StorageError, StorageResult};

/// Filesystem-backed store.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    /// Store rooted at `base`. The directory is created on first write.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Store in the platform data directory.
    pub fn in_default_location() -> StorageResult<Self> {
        Self::default_dir().map(Self::new)
    }

    /// Platform data directory for the storefront client.
    pub fn default_dir() -> StorageResult<PathBuf> {
        ProjectDirs::from("com", "homecraft", "homecraft")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.base).map_err(|e| StorageError::io(key, e))?;

        let tmp = self.base.join(format!(".{}.tmp", key));
        fs::write(&tmp, value).map_err(|e| StorageError::io(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::io(key, e))?;

        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "Removed value");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }
}
