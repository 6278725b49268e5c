use crate::domain::ProviderSessionResponse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderSessionError {
    #[error("failed to read provider session {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to parse provider session: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Asks the identity provider for its current session.
pub trait ProviderSessionSource {
    fn current_session(&self) -> Result<ProviderSessionResponse, ProviderSessionError>;
}

/// A provider session handed over as a JSON document (`-` reads stdin).
#[derive(Clone, Debug)]
pub struct ProviderSessionFile {
    path: PathBuf,
}

impl ProviderSessionFile {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ProviderSessionSource for ProviderSessionFile {
    fn current_session(&self) -> Result<ProviderSessionResponse, ProviderSessionError> {
        let read = if self.path.as_os_str() == "-" {
            io::read_to_string(io::stdin())
        } else {
            fs::read_to_string(&self.path)
        };
        let raw = read.map_err(|source| ProviderSessionError::Read {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(serde_json::from_str(&raw)?)
    }
}
