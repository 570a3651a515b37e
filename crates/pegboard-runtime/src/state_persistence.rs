//! Session persistence for save/restore across runs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      EditorSession                            │
//! │   - serialize-on-change after each successful edit            │
//! │   - load-on-start                                             │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     SessionStorage                            │
//! │   - MemoryStorage: in-memory (testing, ephemeral)             │
//! │   - FileStorage: JSON file with write-rename                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Best effort**: storage failures are reported as `Result`, never panic,
//!    and never touch in-memory editing state.
//! 2. **Atomic writes**: file storage writes a temp file and renames it.
//! 3. **Version gate**: a stored session with another format version is
//!    ignored, not migrated.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returns error, session unaffected |
//! | `StorageError::Serialization` | JSON encode/decode | Returns error, session starts empty |
//! | `StorageError::Corruption` | Lock poisoned | Returns error |
//! | Missing file | First run | `Ok(None)` |

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use pegboard_core::{BoardSpec, Pattern, Tool, ViewMode};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during session storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    Serialization(String),
    /// Storage is in an unusable state.
    Corruption(String),
    /// Backend is not available.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialization(_)
            | StorageError::Corruption(_)
            | StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Stored Session
// ─────────────────────────────────────────────────────────────────────────────

/// Everything needed to resume editing where the user left off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Format version for future migrations.
    pub format_version: u32,
    pub board: BoardSpec,
    pub pattern: Pattern,
    pub selected_color: String,
    pub active_tool: Tool,
    #[serde(default)]
    pub view_mode: ViewMode,
}

impl StoredSession {
    pub const FORMAT_VERSION: u32 = 1;
}

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Pluggable storage for the persisted session.
///
/// # Implementation Notes
///
/// - `load` returns `Ok(None)` when nothing has been stored yet.
/// - `save` replaces whatever was stored and should be atomic.
pub trait SessionStorage: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Load the stored session, if any.
    fn load(&self) -> StorageResult<Option<StoredSession>>;

    /// Store `session`, replacing any previous one.
    fn save(&self, session: &StoredSession) -> StorageResult<()>;

    /// Remove the stored session.
    fn clear(&self) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage for tests and sessions that should not outlive the
/// process.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<Option<StoredSession>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory storage that already holds `session`.
    #[must_use]
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            data: RwLock::new(Some(session)),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load(&self) -> StorageResult<Option<StoredSession>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &StoredSession) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stored = self.data.read().map(|g| g.is_some()).unwrap_or(false);
        f.debug_struct("MemoryStorage")
            .field("stored", &stored)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage
// ─────────────────────────────────────────────────────────────────────────────

/// JSON file storage with an atomic write-rename.
///
/// Writes go to `{path}.tmp`, are flushed and synced, then renamed over
/// `{path}`.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Storage at `$XDG_STATE_HOME/pegboard/{app_name}/session.json`, falling
    /// back to `~/.local/state` and then the current directory.
    #[must_use]
    pub fn default_for_app(app_name: &str) -> Self {
        let path = state_dir()
            .join("pegboard")
            .join(app_name)
            .join("session.json");
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }
}

fn state_dir() -> PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(state_home);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("state");
    }
    PathBuf::from(".")
}

impl SessionStorage for FileStorage {
    fn name(&self) -> &str {
        "FileStorage"
    }

    fn load(&self) -> StorageResult<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let value: serde_json::Value = serde_json::from_reader(reader).map_err(|e| {
            StorageError::Serialization(format!("failed to parse session file: {e}"))
        })?;

        let stored_version = value
            .get("format_version")
            .and_then(serde_json::Value::as_u64);
        if stored_version != Some(u64::from(StoredSession::FORMAT_VERSION)) {
            tracing::warn!(
                stored = ?stored_version,
                expected = StoredSession::FORMAT_VERSION,
                "session file format version mismatch, ignoring stored session"
            );
            return Ok(None);
        }

        let session = serde_json::from_value(value).map_err(|e| {
            StorageError::Serialization(format!("failed to decode session: {e}"))
        })?;
        Ok(Some(session))
    }

    fn save(&self, session: &StoredSession) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.temp_path();
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, session).map_err(|e| {
                StorageError::Serialization(format!("failed to serialize session: {e}"))
            })?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            cells = session.pattern.cells.len(),
            "saved editor session"
        );
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        let Some(parent) = self.path.parent() else {
            return false;
        };
        if !parent.exists() {
            return fs::create_dir_all(parent).is_ok();
        }
        let marker = parent.join(".pegboard_test_write");
        if fs::write(&marker, b"test").is_ok() {
            let _ = fs::remove_file(&marker);
            return true;
        }
        false
    }
}

impl fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
