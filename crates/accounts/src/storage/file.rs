//! File-backed backend.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError, WriteOp};

type Scope = BTreeMap<String, String>;

/// Key-value scope persisted as a single JSON object file.
///
/// Every read loads the file and every write rewrites it through a sibling
/// temp file and a rename, so a batch lands on disk in one step. A missing
/// file is an empty scope.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open (or lazily create) the scope at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Scope, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Scope::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                key: self.path.display().to_string(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Scope::new()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn save(&self, scope: &Scope) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_string_pretty(scope).map_err(|source| StorageError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), keys = scope.len(), "Storage scope written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut scope = self.load()?;
        scope.insert(key.to_owned(), value.to_owned());
        self.save(&scope)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut scope = self.load()?;
        if scope.remove(key).is_some() {
            self.save(&scope)?;
        }
        Ok(())
    }

    fn apply(&self, batch: &[WriteOp<'_>]) -> Result<(), StorageError> {
        let mut scope = self.load()?;
        for op in batch {
            match op {
                WriteOp::Set { key, value } => {
                    scope.insert((*key).to_owned(), value.clone());
                }
                WriteOp::Remove { key } => {
                    scope.remove(*key);
                }
            }
        }
        self.save(&scope)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_scope() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        assert!(store.get("tallyassist_users").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        FileStore::new(&path).set("current_user", "{\"id\":\"1\"}").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("current_user").unwrap().as_deref(),
            Some("{\"id\":\"1\"}")
        );
    }

    #[test]
    fn test_apply_writes_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        store.set("reset_tokens", "{}").unwrap();

        store
            .apply(&[
                WriteOp::Set {
                    key: "tallyassist_users",
                    value: "[]".to_owned(),
                },
                WriteOp::Remove {
                    key: "reset_tokens",
                },
            ])
            .unwrap();

        assert_eq!(store.get("tallyassist_users").unwrap().as_deref(), Some("[]"));
        assert!(store.get("reset_tokens").unwrap().is_none());
        assert!(!dir.path().join("storage.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json at all").unwrap();

        let err = FileStore::new(&path).get("current_user").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
