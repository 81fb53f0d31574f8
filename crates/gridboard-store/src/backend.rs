//! Pluggable storage backends for dashboard records.
//!
//! A backend persists one [`StoreData`] document (every layout and
//! page record) as a unit. Two implementations ship:
//!
//! - [`MemoryStorage`]: in-memory, for tests and ephemeral sessions.
//! - [`FileStorage`]: one JSON file, written with the temp-file +
//!   rename pattern so a crash mid-write never corrupts existing data.
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic; every
//!    operation returns a `Result`.
//! 2. **Atomic writes**: file persistence goes through write-rename.
//! 3. **Version tolerance**: a format-version mismatch loads as empty
//!    (with a warning) instead of failing.

use crate::records::{LayoutRecord, PageRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors from storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O failure during file operations.
    Io(std::io::Error),
    /// JSON encode/decode failure.
    Serialization(String),
    /// Stored data is unreadable or a lock was poisoned.
    Corruption(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
            Self::Corruption(msg) => write!(f, "storage corruption: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialization(_) | Self::Corruption(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Store Document
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the dashboard persists, as one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    /// Saved layouts.
    pub layouts: Vec<LayoutRecord>,
    /// Navigation pages.
    pub pages: Vec<PageRecord>,
}

/// On-disk wrapper with a format version for future migrations.
#[derive(Serialize, Deserialize)]
struct StoreFile {
    format_version: u32,
    #[serde(flatten)]
    data: StoreData,
}

impl StoreFile {
    const FORMAT_VERSION: u32 = 1;
}

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for pluggable record storage.
///
/// `persist` replaces the whole document (not a merge); `load` returns
/// an empty document on first run.
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Load the stored document; empty on first run.
    fn load(&self) -> StorageResult<StoreData>;

    /// Replace the stored document atomically.
    fn persist(&self, data: &StoreData) -> StorageResult<()>;

    /// Remove all stored data.
    fn clear(&self) -> StorageResult<()>;

    /// Whether the backend is functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<StoreData>,
}

impl MemoryStorage {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with records.
    #[must_use]
    pub fn with_data(data: StoreData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load(&self) -> StorageResult<StoreData> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn persist(&self, data: &StoreData) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        *guard = data.clone();
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        *guard = StoreData::default();
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self
            .data
            .read()
            .map(|g| (g.layouts.len(), g.pages.len()))
            .unwrap_or((0, 0));
        f.debug_struct("MemoryStorage")
            .field("layouts", &counts.0)
            .field("pages", &counts.1)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage
// ─────────────────────────────────────────────────────────────────────────────

/// JSON-file backend with atomic write-rename.
///
/// # Atomic Writes
///
/// 1. Write to `{path}.tmp`
/// 2. Flush and sync
/// 3. Rename `{path}.tmp` → `{path}`
pub struct FileStorage {
    path: std::path::PathBuf,
}

impl FileStorage {
    /// Storage at an explicit path. The file is created on first persist.
    #[must_use]
    pub fn new(path: impl AsRef<std::path::Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Storage at the conventional per-app location:
    /// `$XDG_STATE_HOME/gridboard/<app_name>/store.json`, falling back
    /// to `~/.local/state` and finally the current directory.
    #[must_use]
    pub fn default_for_app(app_name: &str) -> Self {
        let base = state_dir_or_fallback();
        Self {
            path: base.join("gridboard").join(app_name).join("store.json"),
        }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn temp_path(&self) -> std::path::PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }
}

fn state_dir_or_fallback() -> std::path::PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return std::path::PathBuf::from(state_home);
    }
    if let Ok(home) = std::env::var("HOME") {
        return std::path::PathBuf::from(home).join(".local").join("state");
    }
    std::path::PathBuf::from(".")
}

impl StorageBackend for FileStorage {
    fn name(&self) -> &str {
        "FileStorage"
    }

    fn load(&self) -> StorageResult<StoreData> {
        use std::io::BufReader;

        if !self.path.exists() {
            return Ok(StoreData::default());
        }
        let file = std::fs::File::open(&self.path)?;
        let store: StoreFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StorageError::Serialization(format!("failed to parse store file: {e}")))?;
        if store.format_version != StoreFile::FORMAT_VERSION {
            tracing::warn!(
                stored = store.format_version,
                expected = StoreFile::FORMAT_VERSION,
                "store file format version mismatch, ignoring stored data"
            );
            return Ok(StoreData::default());
        }
        Ok(store.data)
    }

    fn persist(&self, data: &StoreData) -> StorageResult<()> {
        use std::io::{BufWriter, Write};

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        {
            let file = std::fs::File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            let store = StoreFile {
                format_version: StoreFile::FORMAT_VERSION,
                data: data.clone(),
            };
            serde_json::to_writer_pretty(&mut writer, &store)
                .map_err(|e| StorageError::Serialization(format!("failed to encode store: {e}")))?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .finish()
    }
}
