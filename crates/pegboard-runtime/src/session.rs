//! Editing session: a [`PatternEngine`] plus best-effort persistence.
//!
//! Every operation is forwarded to the engine first. When it changed
//! something and `auto_save` is on, the session is written to its
//! [`SessionStorage`]. A failed write is logged and counted; the in-memory
//! edit stands.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use pegboard_core::{
    BoardSpec, EngineConfig, EngineError, LoadReport, Palette, Pattern, PatternEngine,
    PatternError, PatternMetadata, Tool, ViewMode,
};

use crate::state_persistence::{SessionStorage, StorageResult, StoredSession};

/// When the session touches its storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceConfig {
    /// Restore the stored session on start.
    pub auto_load: bool,
    /// Save after every change.
    pub auto_save: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            auto_load: true,
            auto_save: true,
        }
    }
}

impl PersistenceConfig {
    /// Never load or save automatically.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            auto_load: false,
            auto_save: false,
        }
    }

    #[must_use]
    pub fn auto_load(mut self, enabled: bool) -> Self {
        self.auto_load = enabled;
        self
    }

    #[must_use]
    pub fn auto_save(mut self, enabled: bool) -> Self {
        self.auto_save = enabled;
        self
    }
}

/// Session construction parameters.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub engine: EngineConfig,
    pub persistence: PersistenceConfig,
}

impl SessionConfig {
    #[must_use]
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn with_persistence(mut self, persistence: PersistenceConfig) -> Self {
        self.persistence = persistence;
        self
    }
}

/// A pattern engine with an optional persistence side channel.
pub struct EditorSession {
    engine: PatternEngine,
    storage: Option<Box<dyn SessionStorage>>,
    persistence: PersistenceConfig,
    persist_failures: u64,
    last_persist_error: Option<String>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("engine", &self.engine)
            .field("storage", &self.storage.as_ref().map(|s| s.name()))
            .field("persistence", &self.persistence)
            .field("persist_failures", &self.persist_failures)
            .finish()
    }
}

impl EditorSession {
    /// A session without storage.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            engine: PatternEngine::new(config.engine),
            storage: None,
            persistence: config.persistence,
            persist_failures: 0,
            last_persist_error: None,
        }
    }

    /// A session backed by `storage`, restored from it when `auto_load` is on.
    ///
    /// A stored session that fails to load leaves the session empty; the
    /// failure is recorded in [`last_persist_error`](Self::last_persist_error).
    #[must_use]
    pub fn with_storage(config: SessionConfig, storage: Box<dyn SessionStorage>) -> Self {
        let SessionConfig {
            engine: engine_config,
            persistence,
        } = config;

        let mut last_persist_error = None;
        if !storage.is_available() {
            tracing::warn!(backend = storage.name(), "session storage unavailable, edits may not persist");
            last_persist_error = Some(format!("{} is not available", storage.name()));
        }
        let stored = if persistence.auto_load {
            match storage.load() {
                Ok(stored) => stored,
                Err(err) => {
                    tracing::warn!(backend = storage.name(), error = %err, "failed to load session, starting empty");
                    last_persist_error = Some(err.to_string());
                    None
                }
            }
        } else {
            None
        };

        let engine = match stored {
            Some(stored) => restore(engine_config, stored),
            None => PatternEngine::new(engine_config),
        };
        tracing::info!(
            backend = storage.name(),
            cells = engine.cells().len(),
            "editor session started"
        );

        Self {
            engine,
            storage: Some(storage),
            persistence,
            persist_failures: 0,
            last_persist_error,
        }
    }

    /// Read access for the presentation layer.
    #[must_use]
    pub fn engine(&self) -> &PatternEngine {
        &self.engine
    }

    /// Number of failed saves since the session started.
    #[must_use]
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures
    }

    /// Message of the most recent storage failure.
    #[must_use]
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// The state that would be persisted right now.
    #[must_use]
    pub fn snapshot(&self) -> StoredSession {
        StoredSession {
            format_version: StoredSession::FORMAT_VERSION,
            board: self.engine.board().clone(),
            pattern: self.engine.working_pattern(),
            selected_color: self.engine.selected_color().to_owned(),
            active_tool: self.engine.active_tool(),
            view_mode: self.engine.view_mode(),
        }
    }

    /// Save now, regardless of `auto_save`.
    ///
    /// # Errors
    ///
    /// Storage failures; `Ok(())` when there is no storage.
    pub fn save(&self) -> StorageResult<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        storage.save(&self.snapshot())
    }

    /// Remove the stored session, leaving the in-memory state alone.
    ///
    /// # Errors
    ///
    /// Storage failures; `Ok(())` when there is no storage.
    pub fn clear_saved(&self) -> StorageResult<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        storage.clear()?;
        tracing::info!(backend = storage.name(), "cleared stored session");
        Ok(())
    }

    // ====================================================================
    // Engine operations
    // ====================================================================

    /// See [`PatternEngine::set_cell`].
    ///
    /// # Errors
    ///
    /// [`EngineError::OutOfBounds`].
    pub fn set_cell(&mut self, x: u32, y: u32) -> Result<bool, EngineError> {
        let changed = self.engine.set_cell(x, y)?;
        self.after(changed);
        Ok(changed)
    }

    /// See [`PatternEngine::fill`].
    ///
    /// # Errors
    ///
    /// [`EngineError::OutOfBounds`].
    pub fn fill(&mut self, x: u32, y: u32) -> Result<bool, EngineError> {
        let changed = self.engine.fill(x, y)?;
        self.after(changed);
        Ok(changed)
    }

    /// See [`PatternEngine::apply_tool`].
    ///
    /// # Errors
    ///
    /// [`EngineError::OutOfBounds`].
    pub fn apply_tool(&mut self, x: u32, y: u32) -> Result<bool, EngineError> {
        let changed = self.engine.apply_tool(x, y)?;
        self.after(changed);
        Ok(changed)
    }

    pub fn clear_board(&mut self) -> bool {
        let changed = self.engine.clear_board();
        self.after(changed);
        changed
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.engine.undo();
        self.after(changed);
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.engine.redo();
        self.after(changed);
        changed
    }

    pub fn set_color(&mut self, id: impl Into<String>) {
        self.engine.set_color(id);
        self.after(true);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.engine.set_tool(tool);
        self.after(true);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.engine.set_view_mode(mode);
        self.after(true);
    }

    pub fn set_metadata(&mut self, metadata: PatternMetadata) {
        self.engine.set_metadata(metadata);
        self.after(true);
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.engine.set_palette(palette);
    }

    pub fn resize_board(&mut self, board: BoardSpec) -> usize {
        let dropped = self.engine.resize_board(board);
        self.after(true);
        dropped
    }

    pub fn load_pattern(&mut self, pattern: &Pattern) -> LoadReport {
        let report = self.engine.load_pattern(pattern);
        self.after(true);
        report
    }

    #[must_use]
    pub fn export_pattern(&self) -> Pattern {
        self.engine.export_pattern()
    }

    // ====================================================================
    // Pattern files
    // ====================================================================

    /// Write the exported pattern to `path` as JSON and return it.
    ///
    /// # Errors
    ///
    /// I/O or JSON failures.
    pub fn export_pattern_file(&self, path: impl AsRef<Path>) -> Result<Pattern, PatternError> {
        let pattern = self.engine.export_pattern();
        let writer = BufWriter::new(File::create(path.as_ref())?);
        pattern.write_json(writer)?;
        tracing::info!(path = %path.as_ref().display(), id = %pattern.id, "exported pattern");
        Ok(pattern)
    }

    /// Read a JSON pattern from `path` and load it.
    ///
    /// # Errors
    ///
    /// I/O or JSON failures; the session is untouched in that case.
    pub fn import_pattern_file(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, PatternError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let pattern = Pattern::read_json(reader)?;
        Ok(self.load_pattern(&pattern))
    }

    fn after(&mut self, changed: bool) {
        if !changed || !self.persistence.auto_save {
            return;
        }
        if let Err(err) = self.save() {
            self.persist_failures += 1;
            tracing::warn!(
                error = %err,
                failures = self.persist_failures,
                "failed to persist session, keeping in-memory state"
            );
            self.last_persist_error = Some(err.to_string());
        }
    }
}

fn restore(config: EngineConfig, stored: StoredSession) -> PatternEngine {
    let mut engine = PatternEngine::new(config.with_board(stored.board));
    let report = engine.load_pattern(&stored.pattern);
    engine.set_color(stored.selected_color);
    engine.set_tool(stored.active_tool);
    engine.set_view_mode(stored.view_mode);
    tracing::info!(
        loaded = report.loaded,
        skipped = report.skipped.len(),
        "restored stored session"
    );
    engine
}
