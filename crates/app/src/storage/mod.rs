//! Key-value storage for client-side state.
//!
//! Values are whole JSON documents stored under short fixed keys such as
//! `"cart"` and `"lastOrder"`.

use std::io;

use mockall::automock;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key cannot be mapped to a storage location.
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    /// Backend I/O failure.
    #[error("storage I/O failed for key {key}")]
    Io {
        /// Key being accessed
        key: String,

        /// Underlying error
        #[source]
        source: io::Error,
    },
}

/// Synchronous string storage keyed by name.
#[automock]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
