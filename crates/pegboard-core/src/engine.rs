#![forbid(unsafe_code)]

//! The pattern-editing state engine.
//!
//! [`PatternEngine`] owns the live [`CellGrid`], the selection state and the
//! [`History`]. Presentation code reads snapshots and calls the operations
//! below; it never holds authoritative pattern state itself.
//!
//! # Example
//! ```
//! use pegboard_core::board::BoardSpec;
//! use pegboard_core::engine::{EngineConfig, PatternEngine};
//! use pegboard_core::tool::Tool;
//!
//! let board = BoardSpec::new(3, 3, 5.0).unwrap();
//! let mut engine = PatternEngine::new(EngineConfig::default().with_board(board));
//! engine.set_color("red");
//! engine.set_tool(Tool::Fill);
//! assert!(engine.apply_tool(1, 1).unwrap());
//! assert_eq!(engine.cells().len(), 9);
//! assert_eq!(engine.history_len(), 2);
//!
//! engine.undo();
//! assert!(engine.cells().is_empty());
//! ```
//!
//! # Invariants
//!
//! 1. `history().current() == cells()` after every operation.
//! 2. A mutation that would not change the grid records nothing.
//! 3. Out-of-bounds coordinates are rejected with [`EngineError::OutOfBounds`]
//!    before any state is touched.

use std::fmt;
use std::sync::Arc;

use crate::board::BoardSpec;
use crate::coord::GridPos;
use crate::grid::CellGrid;
use crate::history::{DEFAULT_MAX_HISTORY, History};
use crate::palette::Palette;
use crate::pattern::{Pattern, PatternMetadata};
use crate::provenance::{Provenance, SystemProvenance};
use crate::sheet::BillOfMaterials;
use crate::tool::{Tool, ViewMode};

/// Errors from grid-mutating operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The coordinate is not a hole on the current board.
    OutOfBounds { x: u32, y: u32, cols: u32, rows: u32 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::OutOfBounds { x, y, cols, rows } => {
                write!(f, "cell ({x}, {y}) is outside the {cols}x{rows} board")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Outcome of [`PatternEngine::load_pattern`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Cells placed on the board.
    pub loaded: usize,
    /// Keys that did not decode, fell outside the board, or carried a value
    /// that is not a color id.
    pub skipped: Vec<String>,
}

/// Construction parameters for [`PatternEngine`].
#[derive(Clone)]
pub struct EngineConfig {
    pub board: BoardSpec,
    pub palette: Palette,
    pub initial_tool: Tool,
    /// Initial selection; the first palette entry when `None`.
    pub initial_color: Option<String>,
    /// Snapshot capacity of the undo history.
    pub max_history: usize,
    pub provenance: Arc<dyn Provenance>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board: BoardSpec::default(),
            palette: Palette::default(),
            initial_tool: Tool::Paint,
            initial_color: None,
            max_history: DEFAULT_MAX_HISTORY,
            provenance: Arc::new(SystemProvenance),
        }
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("board", &self.board)
            .field("palette", &self.palette.len())
            .field("initial_tool", &self.initial_tool)
            .field("initial_color", &self.initial_color)
            .field("max_history", &self.max_history)
            .finish_non_exhaustive()
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_board(mut self, board: BoardSpec) -> Self {
        self.board = board;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.initial_tool = tool;
        self
    }

    #[must_use]
    pub fn with_color(mut self, id: impl Into<String>) -> Self {
        self.initial_color = Some(id.into());
        self
    }

    /// Set the history capacity (clamped to at least 1).
    #[must_use]
    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = max.max(1);
        self
    }

    #[must_use]
    pub fn with_provenance(mut self, provenance: Arc<dyn Provenance>) -> Self {
        self.provenance = provenance;
        self
    }
}

/// Pattern editing engine.
pub struct PatternEngine {
    board: BoardSpec,
    palette: Palette,
    cells: CellGrid,
    pattern_id: String,
    metadata: PatternMetadata,
    selected_color: String,
    active_tool: Tool,
    view_mode: ViewMode,
    history: History,
    provenance: Arc<dyn Provenance>,
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl fmt::Debug for PatternEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternEngine")
            .field("board", &(self.board.cols(), self.board.rows()))
            .field("cells", &self.cells.len())
            .field("selected_color", &self.selected_color)
            .field("active_tool", &self.active_tool)
            .field("view_mode", &self.view_mode)
            .field("history_len", &self.history.len())
            .field("history_pointer", &self.history.pointer())
            .finish_non_exhaustive()
    }
}

impl PatternEngine {
    /// Empty grid, single-entry history.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let selected_color = config
            .initial_color
            .or_else(|| config.palette.first().map(|e| e.id.clone()))
            .unwrap_or_default();
        let cells = CellGrid::empty();
        let pattern_id = config.provenance.new_id();
        Self {
            board: config.board,
            palette: config.palette,
            history: History::with_capacity(cells.clone(), config.max_history),
            cells,
            pattern_id,
            metadata: PatternMetadata::default(),
            selected_color,
            active_tool: config.initial_tool,
            view_mode: ViewMode::default(),
            provenance: config.provenance,
        }
    }

    // ====================================================================
    // Read access
    // ====================================================================

    #[must_use]
    pub fn board(&self) -> &BoardSpec {
        &self.board
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The live snapshot. Clone it to keep a stable view across edits.
    #[must_use]
    pub fn cells(&self) -> &CellGrid {
        &self.cells
    }

    /// Color at `(x, y)`, `None` when empty or off the board.
    #[must_use]
    pub fn cell(&self, x: u32, y: u32) -> Option<&str> {
        self.cells.get(GridPos::new(x, y))
    }

    /// Identifier of the pattern being edited: minted at construction,
    /// replaced by [`load_pattern`](Self::load_pattern).
    #[must_use]
    pub fn pattern_id(&self) -> &str {
        &self.pattern_id
    }

    #[must_use]
    pub fn metadata(&self) -> &PatternMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn selected_color(&self) -> &str {
        &self.selected_color
    }

    #[must_use]
    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn history_pointer(&self) -> usize {
        self.history.pointer()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Peg counts for the printable sheet.
    #[must_use]
    pub fn bill_of_materials(&self) -> BillOfMaterials {
        BillOfMaterials::from_grid(&self.cells, &self.palette)
    }

    // ====================================================================
    // Selection
    // ====================================================================

    pub fn set_color(&mut self, id: impl Into<String>) {
        self.selected_color = id.into();
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.active_tool = tool;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn set_metadata(&mut self, metadata: PatternMetadata) {
        self.metadata = metadata;
    }

    /// Swap the palette. Cells keeping ids the new palette lacks are left as
    /// they are and render with [`Palette::FALLBACK`].
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    // ====================================================================
    // Grid mutation
    // ====================================================================

    /// Paint or erase one hole according to the active tool.
    ///
    /// Returns `Ok(false)` when the hole already holds the target value; no
    /// history entry is recorded in that case.
    ///
    /// # Errors
    ///
    /// [`EngineError::OutOfBounds`] when `(x, y)` is off the board.
    pub fn set_cell(&mut self, x: u32, y: u32) -> Result<bool, EngineError> {
        let pos = self.checked(x, y)?;
        let target = self
            .active_tool
            .is_paint_like()
            .then_some(self.selected_color.as_str());
        if self.cells.get(pos) == target {
            tracing::trace!(x, y, "set_cell unchanged");
            return Ok(false);
        }
        let next = self.cells.with_cell(pos, target);
        tracing::debug!(x, y, tool = self.active_tool.label(), "set_cell");
        self.commit(next);
        Ok(true)
    }

    /// Flood-fill the 4-connected region containing `(x, y)` with the
    /// selected color, as a single history entry.
    ///
    /// Returns `Ok(false)` when the region already has the selected color.
    ///
    /// # Errors
    ///
    /// [`EngineError::OutOfBounds`] when `(x, y)` is off the board.
    pub fn fill(&mut self, x: u32, y: u32) -> Result<bool, EngineError> {
        let pos = self.checked(x, y)?;
        let Some((next, recolored)) = self.cells.flood_fill(&self.board, pos, &self.selected_color)
        else {
            tracing::trace!(x, y, "fill unchanged");
            return Ok(false);
        };
        tracing::debug!(x, y, recolored, color = %self.selected_color, "fill");
        self.commit(next);
        Ok(true)
    }

    /// Dispatch a click at `(x, y)` on the active tool.
    ///
    /// # Errors
    ///
    /// [`EngineError::OutOfBounds`] when `(x, y)` is off the board.
    pub fn apply_tool(&mut self, x: u32, y: u32) -> Result<bool, EngineError> {
        match self.active_tool {
            Tool::Fill => self.fill(x, y),
            Tool::Paint | Tool::Erase | Tool::Line => self.set_cell(x, y),
        }
    }

    /// Empty every hole. Returns `false` (and records nothing) when the grid
    /// is already empty.
    pub fn clear_board(&mut self) -> bool {
        if self.cells.is_empty() {
            return false;
        }
        tracing::debug!(cleared = self.cells.len(), "clear_board");
        self.commit(CellGrid::empty());
        true
    }

    /// Step back one snapshot. No-op at the oldest.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(grid) => {
                self.cells = grid.clone();
                true
            }
            None => false,
        }
    }

    /// Step forward one snapshot. No-op at the newest.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(grid) => {
                self.cells = grid.clone();
                true
            }
            None => false,
        }
    }

    // ====================================================================
    // Board and pattern exchange
    // ====================================================================

    /// Install a new board, dropping cells that no longer fit.
    ///
    /// History restarts from the clipped grid, so undo can never bring back
    /// cells outside the board. Returns the number of cells dropped.
    pub fn resize_board(&mut self, board: BoardSpec) -> usize {
        let (clipped, dropped) = self.cells.clipped_to(&board);
        tracing::debug!(
            cols = board.cols(),
            rows = board.rows(),
            dropped,
            "resize_board"
        );
        self.board = board;
        self.cells = clipped.clone();
        self.history.reset(clipped);
        dropped
    }

    /// Replace the grid and metadata with `pattern` and start a fresh history.
    ///
    /// Keys that do not decode or fall off the board are skipped, as are the
    /// entries the pattern already dropped while decoding.
    pub fn load_pattern(&mut self, pattern: &Pattern) -> LoadReport {
        let (grid, mut skipped) = CellGrid::from_key_map(&pattern.cells, &self.board);
        skipped.extend(pattern.malformed_cells.iter().cloned());
        let report = LoadReport {
            loaded: grid.len(),
            skipped,
        };
        tracing::debug!(
            id = %pattern.id,
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "load_pattern"
        );
        self.pattern_id = pattern.id.clone();
        self.metadata = pattern.metadata.clone();
        self.cells = grid.clone();
        self.history.reset(grid);
        report
    }

    /// Snapshot the live grid as a new pattern with a fresh id and
    /// creation time.
    #[must_use]
    pub fn export_pattern(&self) -> Pattern {
        let mut metadata = self.metadata.clone();
        metadata.created = self.provenance.now_millis();
        Pattern::new(self.provenance.new_id(), metadata, self.cells.to_key_map())
    }

    /// The pattern being edited, as it stands: same id and metadata, no
    /// fresh timestamp. Used for saving a session rather than exporting.
    #[must_use]
    pub fn working_pattern(&self) -> Pattern {
        Pattern::new(
            self.pattern_id.clone(),
            self.metadata.clone(),
            self.cells.to_key_map(),
        )
    }

    fn checked(&self, x: u32, y: u32) -> Result<GridPos, EngineError> {
        let pos = GridPos::new(x, y);
        if self.board.contains(pos) {
            Ok(pos)
        } else {
            tracing::debug!(x, y, "rejecting out-of-bounds edit");
            Err(EngineError::OutOfBounds {
                x,
                y,
                cols: self.board.cols(),
                rows: self.board.rows(),
            })
        }
    }

    fn commit(&mut self, next: CellGrid) {
        self.cells = next.clone();
        self.history.record(next);
        debug_assert_eq!(self.history.current(), &self.cells);
    }
}
