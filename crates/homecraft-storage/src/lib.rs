//! # homecraft-storage: Durable Key/Value Storage
//!
//! The storefront persists exactly three string values (`token`, `user`,
//! `cartItems`). This crate provides the small key/value abstraction they
//! are written through, plus typed JSON helpers on top.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storage Layer Architecture                          │
//! │                                                                         │
//! │  CartStore / SessionStore (homecraft-client)                           │
//! │         │                                                               │
//! │         │  get_json / set_json / remove                                 │
//! │         ▼                                                               │
//! │  ┌────────────────────────────────────────────────┐                    │
//! │  │          dyn KeyValueStore (THIS CRATE)        │                    │
//! │  └──────────────┬──────────────────────┬──────────┘                    │
//! │                 │                      │                                │
//! │         ┌───────▼───────┐      ┌───────▼───────┐                        │
//! │         │  MemoryStore  │      │   FileStore   │                        │
//! │         │  tests, dry   │      │ <dir>/<key>   │                        │
//! │         │  runs         │      │ one file/key  │                        │
//! │         └───────────────┘      └───────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All operations are synchronous: a write has landed when the call
//! returns, which is what write-through persistence needs.
//!
//! ## Usage
//! ```rust
//! use homecraft_storage::{KeyValueStore, KeyValueStoreExt, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set_json("numbers", &vec![1, 2, 3]).unwrap();
//! let back: Option<Vec<u32>> = store.get_json("numbers").unwrap();
//! assert_eq!(back, Some(vec![1, 2, 3]));
//! ```

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

// =============================================================================
// KeyValueStore Trait
// =============================================================================

/// String-keyed, string-valued durable storage.
///
/// Absence of a key is the empty/default state, so `get` returns `Ok(None)`
/// for a missing key and `remove` of a missing key succeeds.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;
}

// =============================================================================
// Typed JSON Helpers
// =============================================================================

/// JSON encode/decode on top of any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads and decodes a JSON value. A value that doesn't decode is
    /// reported as [`StorageError::Corrupt`].
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    /// Encodes `value` as JSON and writes it.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
