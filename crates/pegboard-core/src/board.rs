//! Board specification: grid dimensions plus the physical peg geometry.
//!
//! A [`BoardSpec`] is an immutable value. Changing the board means building a
//! new spec and handing it to the engine, which prunes cells that no longer fit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::GridPos;

/// Reasons a board description is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardError {
    /// `cols` or `rows` is zero.
    EmptyGrid { cols: u32, rows: u32 },
    /// `cols` or `rows` exceeds [`BoardSpec::MAX_DIMENSION`].
    TooLarge { cols: u32, rows: u32 },
    /// A length that must be strictly positive and finite is not.
    NonPositive { field: &'static str, value: f64 },
    /// Margin is negative or not finite.
    InvalidMargin(f64),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::EmptyGrid { cols, rows } => {
                write!(f, "board must have at least one column and row, got {cols}x{rows}")
            }
            BoardError::TooLarge { cols, rows } => write!(
                f,
                "board {cols}x{rows} exceeds the {max}x{max} limit",
                max = BoardSpec::MAX_DIMENSION
            ),
            BoardError::NonPositive { field, value } => {
                write!(f, "board {field} must be positive, got {value}")
            }
            BoardError::InvalidMargin(value) => {
                write!(f, "board margin must be non-negative, got {value}")
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// Immutable description of a pegboard.
///
/// All physical lengths are millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoardSpec", into = "RawBoardSpec")]
pub struct BoardSpec {
    cols: u32,
    rows: u32,
    pitch: f64,
    peg_diameter: f64,
    peg_height: f64,
    margin: f64,
}

impl BoardSpec {
    /// Columns on the classic square board.
    pub const DEFAULT_COLS: u32 = 29;
    /// Rows on the classic square board.
    pub const DEFAULT_ROWS: u32 = 29;
    /// Centre-to-centre spacing of the classic board.
    pub const DEFAULT_PITCH: f64 = 5.0;
    /// Largest accepted column or row count. Keeps `cols * rows` within a
    /// 32-bit `usize`.
    pub const MAX_DIMENSION: u32 = 4096;

    /// Create a board with default peg geometry.
    ///
    /// # Errors
    ///
    /// Rejects zero or oversized dimensions and a non-positive pitch.
    pub fn new(cols: u32, rows: u32, pitch: f64) -> Result<Self, BoardError> {
        let spec = Self {
            cols,
            rows,
            pitch,
            peg_diameter: pitch * 0.94,
            peg_height: pitch,
            margin: pitch,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Same board with different peg diameter and height.
    ///
    /// # Errors
    ///
    /// Rejects non-positive sizes.
    pub fn with_peg(mut self, diameter: f64, height: f64) -> Result<Self, BoardError> {
        self.peg_diameter = diameter;
        self.peg_height = height;
        self.validate()?;
        Ok(self)
    }

    /// Same board with a different outer margin.
    ///
    /// # Errors
    ///
    /// Rejects negative margins.
    pub fn with_margin(mut self, margin: f64) -> Result<Self, BoardError> {
        self.margin = margin;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), BoardError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(BoardError::EmptyGrid {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.cols > Self::MAX_DIMENSION || self.rows > Self::MAX_DIMENSION {
            return Err(BoardError::TooLarge {
                cols: self.cols,
                rows: self.rows,
            });
        }
        for (field, value) in [
            ("pitch", self.pitch),
            ("peg diameter", self.peg_diameter),
            ("peg height", self.peg_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(BoardError::NonPositive { field, value });
            }
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(BoardError::InvalidMargin(self.margin));
        }
        Ok(())
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Centre-to-centre peg spacing.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    #[must_use]
    pub fn peg_diameter(&self) -> f64 {
        self.peg_diameter
    }

    #[must_use]
    pub fn peg_height(&self) -> f64 {
        self.peg_height
    }

    #[must_use]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Physical width including both side margins.
    #[must_use]
    pub fn width(&self) -> f64 {
        f64::from(self.cols) * self.pitch + 2.0 * self.margin
    }

    /// Physical height including top and bottom margins.
    #[must_use]
    pub fn height(&self) -> f64 {
        f64::from(self.rows) * self.pitch + 2.0 * self.margin
    }

    /// Total number of peg holes.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Whether `pos` is a hole on this board.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x < self.cols && pos.y < self.rows
    }

    /// Row-major index of `pos`, or `None` when off the board.
    #[inline]
    #[must_use]
    pub fn index(&self, pos: GridPos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.cols as usize + pos.x as usize)
    }

    /// Centre of the peg at `pos`, measured from the board's top-left corner.
    #[must_use]
    pub fn peg_center(&self, pos: GridPos) -> (f64, f64) {
        (
            self.margin + (f64::from(pos.x) + 0.5) * self.pitch,
            self.margin + (f64::from(pos.y) + 0.5) * self.pitch,
        )
    }
}

impl Default for BoardSpec {
    fn default() -> Self {
        Self {
            cols: Self::DEFAULT_COLS,
            rows: Self::DEFAULT_ROWS,
            pitch: Self::DEFAULT_PITCH,
            peg_diameter: 4.7,
            peg_height: 5.0,
            margin: 5.0,
        }
    }
}

/// Unvalidated wire form; deserialization goes through [`BoardSpec::validate`].
#[derive(Serialize, Deserialize)]
struct RawBoardSpec {
    cols: u32,
    rows: u32,
    pitch: f64,
    peg_diameter: f64,
    peg_height: f64,
    margin: f64,
}

impl TryFrom<RawBoardSpec> for BoardSpec {
    type Error = BoardError;

    fn try_from(raw: RawBoardSpec) -> Result<Self, Self::Error> {
        let spec = Self {
            cols: raw.cols,
            rows: raw.rows,
            pitch: raw.pitch,
            peg_diameter: raw.peg_diameter,
            peg_height: raw.peg_height,
            margin: raw.margin,
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl From<BoardSpec> for RawBoardSpec {
    fn from(spec: BoardSpec) -> Self {
        Self {
            cols: spec.cols,
            rows: spec.rows,
            pitch: spec.pitch,
            peg_diameter: spec.peg_diameter,
            peg_height: spec.peg_height,
            margin: spec.margin,
        }
    }
}
