#![forbid(unsafe_code)]

//! Pattern-editing core for the pegboard designer.
//!
//! This crate holds everything that decides what a pattern *is*, with no
//! rendering surface attached:
//! - [`coord`] - grid positions and the canonical `"x,y"` key codec
//! - [`board`] - immutable board dimensions and peg geometry
//! - [`palette`] - peg colors
//! - [`grid`] - copy-on-write cell snapshots and flood fill
//! - [`history`] - linear undo/redo over snapshots
//! - [`pattern`] - the exported/persisted unit and its JSON form
//! - [`engine`] - the [`PatternEngine`] tying it all together
//! - [`sheet`] - per-color peg counts for the printable sheet
//!
//! # Example
//! ```
//! use pegboard_core::{EngineConfig, PatternEngine, Tool};
//!
//! let mut engine = PatternEngine::new(EngineConfig::default());
//! engine.set_color("blue");
//! engine.set_cell(0, 0).unwrap();
//! engine.set_cell(0, 0).unwrap(); // same value: no new history entry
//! assert_eq!(engine.history_len(), 2);
//!
//! engine.set_tool(Tool::Erase);
//! engine.set_cell(0, 0).unwrap();
//! assert!(engine.cells().is_empty());
//!
//! let exported = engine.export_pattern();
//! assert!(exported.cells.is_empty());
//! ```

pub mod board;
pub mod coord;
pub mod engine;
pub mod grid;
pub mod history;
pub mod palette;
pub mod pattern;
pub mod provenance;
pub mod sheet;
pub mod tool;

pub use board::{BoardError, BoardSpec};
pub use coord::{GridPos, KeyError, decode, encode};
pub use engine::{EngineConfig, EngineError, LoadReport, PatternEngine};
pub use grid::CellGrid;
pub use history::History;
pub use palette::{Palette, PaletteEntry, PaletteError, Rgb};
pub use pattern::{Difficulty, Pattern, PatternError, PatternMetadata};
pub use provenance::{FixedProvenance, Provenance, SystemProvenance};
pub use sheet::{BillOfMaterials, MaterialLine};
pub use tool::{Tool, ViewMode};
