#![forbid(unsafe_code)]

//! Pegboard pattern designer public facade crate.
//!
//! Re-exports the editing core and, with the default `runtime` feature, the
//! persistent editing session. Most callers only need the [`prelude`].

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use pegboard_core::{
    BillOfMaterials, BoardError, BoardSpec, CellGrid, Difficulty, EngineConfig, EngineError,
    GridPos, History, KeyError, LoadReport, MaterialLine, Palette, PaletteEntry, PaletteError,
    Pattern, PatternEngine, PatternError, PatternMetadata, Rgb, Tool, ViewMode, decode, encode,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use pegboard_runtime::{
    EditorSession, FileStorage, LogFormat, MemoryStorage, PersistenceConfig, SessionConfig,
    SessionStorage, StorageError, init_logging,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for pegboard apps.
#[derive(Debug)]
pub enum Error {
    /// Invalid board dimensions.
    Board(BoardError),
    /// Invalid palette.
    Palette(PaletteError),
    /// Rejected edit.
    Engine(EngineError),
    /// Malformed cell key.
    Key(KeyError),
    /// Pattern file could not be read or written.
    Pattern(PatternError),
    /// Session storage failure.
    #[cfg(feature = "runtime")]
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board(err) => write!(f, "{err}"),
            Self::Palette(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
            Self::Key(err) => write!(f, "{err}"),
            Self::Pattern(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Board(err) => Some(err),
            Self::Palette(err) => Some(err),
            Self::Engine(err) => Some(err),
            Self::Key(err) => Some(err),
            Self::Pattern(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<BoardError> for Error {
    fn from(err: BoardError) -> Self {
        Self::Board(err)
    }
}

impl From<PaletteError> for Error {
    fn from(err: PaletteError) -> Self {
        Self::Palette(err)
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl From<KeyError> for Error {
    fn from(err: KeyError) -> Self {
        Self::Key(err)
    }
}

impl From<PatternError> for Error {
    fn from(err: PatternError) -> Self {
        Self::Pattern(err)
    }
}

#[cfg(feature = "runtime")]
impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

/// Standard result type for pegboard APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoardSpec, EngineConfig, Error, GridPos, Palette, Pattern, PatternEngine, PatternMetadata,
        Result, Tool, ViewMode,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{EditorSession, FileStorage, SessionConfig};

    pub use crate::core;
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use pegboard_core as core;
#[cfg(feature = "runtime")]
pub use pegboard_runtime as runtime;
