//! Atomic TOML file operations.
//!
//! Writes go to a sibling temp file that is fsynced and renamed over the
//! target, so readers never observe a half-written file. Read-modify-write
//! cycles hold an exclusive lock on a sibling `.lock` file.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by [`AtomicTomlFile`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Lock error on {path}: {message}")]
    Lock { path: PathBuf, message: String },

    #[error("Invalid storage path: {0}")]
    InvalidPath(PathBuf),
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A TOML file holding one serialized `T`, updated atomically.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded
    /// - `Ok(None)`: File missing or blank
    /// - `Err`: Unreadable or malformed
    pub fn load(&self) -> Result<Option<T>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Serializes `data` and replaces the file atomically.
    pub fn save(&self, data: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path).map_err(|e| StorageError::io(&tmp_path, e))?;
        tmp_file
            .write_all(toml_string.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|e| StorageError::io(&tmp_path, e))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))
    }

    /// Loads the current value (or `default_value`), applies `f` and saves,
    /// all under an exclusive file lock.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut T),
    {
        self.modify(default_value, |data| {
            f(data);
            ((), true)
        })
    }

    /// Like [`update`](Self::update), but `f` returns a result and whether it
    /// changed the value. The file is rewritten only in that case.
    pub fn modify<R, F>(&self, default_value: T, f: F) -> Result<R, StorageError>
    where
        F: FnOnce(&mut T) -> (R, bool),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let (result, changed) = f(&mut data);
        if changed {
            self.save(&data)?;
        }
        Ok(result)
    }

    fn temp_path(&self) -> Result<PathBuf, StorageError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| StorageError::InvalidPath(self.path.clone()))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(self.path.clone()))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock on `<path>.lock`, released on drop.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, StorageError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StorageError::io(&lock_path, e))?;

        fs2::FileExt::lock_exclusive(&file).map_err(|e| StorageError::Lock {
            path: lock_path.clone(),
            message: e.to_string(),
        })?;

        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // The lock file itself is left in place; removing it would race with
        // a second process that already opened it.
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Sample>::new(temp_dir.path().join("sample.toml"));

        let sample = Sample {
            name: "ragc".to_string(),
            count: 3,
        };
        file.save(&sample).unwrap();

        assert_eq!(file.load().unwrap(), Some(sample));
        assert!(!temp_dir.path().join(".sample.toml.tmp").exists());
    }

    #[test]
    fn test_load_missing_and_blank() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.toml");
        let file = AtomicTomlFile::<Sample>::new(path.clone());

        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "name = ").unwrap();

        let err = AtomicTomlFile::<Sample>::new(path.clone()).load().unwrap_err();
        assert!(matches!(err, StorageError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_update_creates_nested_dirs_and_merges() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("map.toml");
        let file = AtomicTomlFile::<BTreeMap<String, String>>::new(path);

        file.update(BTreeMap::new(), |m| {
            m.insert("a".to_string(), "1".to_string());
        })
        .unwrap();
        file.update(BTreeMap::new(), |m| {
            m.insert("b".to_string(), "2".to_string());
        })
        .unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.get("a").map(String::as_str), Some("1"));
        assert_eq!(loaded.get("b").map(String::as_str), Some("2"));
    }
}
