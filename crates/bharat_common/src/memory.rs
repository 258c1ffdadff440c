//! Persisted user memory.
//!
//! A single small JSON record, loaded once at startup and written back
//! synchronously on every mutation before any speech that depends on
//! the new value. Pretty-printed and kept in raw UTF-8 so the file
//! stays human-readable with Devanagari names intact.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMemory {
    /// The user's learned name, if any.
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("failed to read memory file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("memory file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write memory file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load the memory record, creating a default file on first run.
pub fn load(path: &Path) -> Result<UserMemory, MemoryError> {
    if !path.exists() {
        let fresh = UserMemory::default();
        save(path, &fresh)?;
        return Ok(fresh);
    }
    let content = fs::read_to_string(path).map_err(|source| MemoryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| MemoryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrite the persisted record atomically (temp file + rename), so
/// a crash mid-write never leaves a torn file behind.
pub fn save(path: &Path, memory: &UserMemory) -> Result<(), MemoryError> {
    let content = serde_json::to_string_pretty(memory).map_err(|source| MemoryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, &content).map_err(|source| MemoryError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn atomic_write(path: &Path, data: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)
}
