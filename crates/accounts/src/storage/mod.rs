//! Persistence backends for the credential store.
//!
//! The store only ever talks to a [`KeyValueStore`]: a flat scope of string
//! keys holding JSON text, the same shape as browser local storage.
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process map, clones share one scope
//! - [`FileStore`] - one JSON file per scope, rewritten atomically

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be decoded.
    #[error("stored value for `{key}` is corrupt: {source}")]
    Corrupt {
        /// Key holding the bad value.
        key: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode value for `{key}`: {source}")]
    Encode {
        /// Key being written.
        key: String,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// A single mutation inside a write batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp<'a> {
    /// Store `value` under `key`, replacing any previous value.
    Set {
        /// Target key.
        key: &'a str,
        /// Serialized value.
        value: String,
    },
    /// Delete `key` if present.
    Remove {
        /// Target key.
        key: &'a str,
    },
}

/// Durable string key-value scope.
///
/// Methods take `&self`; backends use interior mutability so several handles
/// can point at the same scope, like two tabs of one origin.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Apply a batch of writes as one logical write.
    ///
    /// The default applies the ops in order and is only as atomic as the
    /// individual calls. Backends that can do better override it.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` encountered.
    fn apply(&self, batch: &[WriteOp<'_>]) -> Result<(), StorageError> {
        for op in batch {
            match op {
                WriteOp::Set { key, value } => self.set(key, value)?,
                WriteOp::Remove { key } => self.remove(key)?,
            }
        }
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn apply(&self, batch: &[WriteOp<'_>]) -> Result<(), StorageError> {
        (**self).apply(batch)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn apply(&self, batch: &[WriteOp<'_>]) -> Result<(), StorageError> {
        (**self).apply(batch)
    }
}

/// Storage keys owned by the credential store.
pub mod keys {
    /// Ordered list of user records.
    pub const USERS: &str = "tallyassist_users";

    /// Map from reset token to `{ email, expires }`.
    pub const RESET_TOKENS: &str = "reset_tokens";

    /// The single current session, absent when signed out.
    pub const CURRENT_USER: &str = "current_user";

    /// Profile keys older builds mirrored next to the session slot.
    ///
    /// Never written. Removed on logout so stale copies cannot outlive the
    /// session they were copied from.
    pub const LEGACY_PROFILE: [&str; 3] = [
        "tallyAssist_username",
        "tallyAssist_email",
        "tallyAssist_plan",
    ];
}

/// Read and decode the JSON value stored under `key`.
pub(crate) fn read_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: KeyValueStore + ?Sized,
    T: serde::de::DeserializeOwned,
{
    store
        .get(key)?
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                key: key.to_owned(),
                source,
            })
        })
        .transpose()
}

/// Encode `value` as a `Set` op for `key`.
pub(crate) fn set_json<'a, T: serde::Serialize + ?Sized>(
    key: &'a str,
    value: &T,
) -> Result<WriteOp<'a>, StorageError> {
    let value = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_owned(),
        source,
    })?;
    Ok(WriteOp::Set { key, value })
}
