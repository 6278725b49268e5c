use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Durable string key/value storage backed by one JSON file in the state dir.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum LoadStorageError {
    #[error("failed to read local storage: {0}")]
    Read(#[from] io::Error),

    #[error("failed to parse local storage: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SaveStorageError {
    #[error("failed to encode local storage: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write local storage: {0}")]
    Write(#[from] io::Error),
}

fn storage_path(state_dir: &Path) -> PathBuf {
    state_dir.join("storage.json")
}

impl LocalStorage {
    pub fn open(state_dir: &Path) -> Result<Self, LoadStorageError> {
        let path = storage_path(state_dir);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    entries: BTreeMap::new(),
                });
            }
            Err(error) => return Err(error.into()),
        };

        let file: StorageFile = serde_json::from_str(&raw)?;
        Ok(Self {
            path,
            entries: file.entries,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|value| value.as_str())
    }

    /// Writes every pair in one flush. On failure nothing changes, in memory
    /// or on disk.
    pub fn set_all(&mut self, pairs: &[(&str, &str)]) -> Result<(), SaveStorageError> {
        let previous = self.entries.clone();
        for (key, value) in pairs {
            self.entries.insert((*key).to_string(), (*value).to_string());
        }
        self.commit(previous)
    }

    pub fn remove_all(&mut self, keys: &[&str]) -> Result<(), SaveStorageError> {
        let previous = self.entries.clone();
        let mut removed = false;
        for key in keys {
            removed |= self.entries.remove(*key).is_some();
        }
        if !removed && !self.path.exists() {
            return Ok(());
        }
        self.commit(previous)
    }

    fn commit(&mut self, previous: BTreeMap<String, String>) -> Result<(), SaveStorageError> {
        if let Err(error) = self.flush() {
            self.entries = previous;
            return Err(error);
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), SaveStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let file = StorageFile {
            version: 1,
            entries: self.entries.clone(),
        };
        let text = serde_json::to_string_pretty(&file)?;
        fs::write(&tmp, text)?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StorageFile {
    version: u32,
    entries: BTreeMap<String, String>,
}
