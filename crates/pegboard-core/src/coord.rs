#![forbid(unsafe_code)]

//! Grid positions and the canonical `"x,y"` key codec.
//!
//! Keys are the external serialization form of a cell position inside a
//! [`Pattern`](crate::pattern::Pattern): decimal `x`, a comma, decimal `y`,
//! with no sign, no whitespace and no leading zeros. [`decode`] is the exact
//! inverse of [`encode`] and rejects anything `encode` would never produce.

use std::fmt;
use std::str::FromStr;

/// Separator between the two components of a key.
pub const KEY_SEPARATOR: char = ',';

/// A peg hole on the board, addressed by column (`x`) and row (`y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GridPos {
    /// Column, counted from the left edge.
    pub x: u32,
    /// Row, counted from the top edge.
    pub y: u32,
}

impl GridPos {
    /// Create a position.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Canonical key for this position.
    #[must_use]
    pub fn key(self) -> String {
        encode(self.x, self.y)
    }

    /// The up-to-four orthogonal neighbours, skipping any that would underflow.
    ///
    /// Upper bounds are not checked here; callers clip against the board.
    pub fn orthogonal_neighbors(self) -> impl Iterator<Item = GridPos> {
        let Self { x, y } = self;
        [
            x.checked_add(1).map(|nx| GridPos::new(nx, y)),
            x.checked_sub(1).map(|nx| GridPos::new(nx, y)),
            y.checked_add(1).map(|ny| GridPos::new(x, ny)),
            y.checked_sub(1).map(|ny| GridPos::new(x, ny)),
        ]
        .into_iter()
        .flatten()
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.x, self.y)
    }
}

impl From<(u32, u32)> for GridPos {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

impl FromStr for GridPos {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(GridPos::from)
    }
}

/// Reasons a string is not a canonical position key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// No `,` separator, or more than one.
    MissingSeparator(String),
    /// One side of the separator is empty.
    EmptyComponent(String),
    /// A component contains something other than ASCII digits.
    NotDecimal(String),
    /// A multi-digit component starts with `0`.
    LeadingZero(String),
    /// A component does not fit in `u32`.
    Overflow(String),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::MissingSeparator(key) => write!(f, "key {key:?} is not of the form x,y"),
            KeyError::EmptyComponent(key) => write!(f, "key {key:?} has an empty component"),
            KeyError::NotDecimal(key) => write!(f, "key {key:?} has a non-decimal component"),
            KeyError::LeadingZero(key) => write!(f, "key {key:?} has a leading zero"),
            KeyError::Overflow(key) => write!(f, "key {key:?} is out of coordinate range"),
        }
    }
}

impl std::error::Error for KeyError {}

/// Encode a position as its canonical key, e.g. `(3, 14)` becomes `"3,14"`.
#[must_use]
pub fn encode(x: u32, y: u32) -> String {
    format!("{x}{KEY_SEPARATOR}{y}")
}

/// Decode a canonical key back into `(x, y)`.
///
/// # Errors
///
/// Returns [`KeyError`] for anything [`encode`] cannot produce.
pub fn decode(key: &str) -> Result<(u32, u32), KeyError> {
    let (xs, ys) = key
        .split_once(KEY_SEPARATOR)
        .ok_or_else(|| KeyError::MissingSeparator(key.to_owned()))?;
    if ys.contains(KEY_SEPARATOR) {
        return Err(KeyError::MissingSeparator(key.to_owned()));
    }
    Ok((component(xs, key)?, component(ys, key)?))
}

fn component(part: &str, key: &str) -> Result<u32, KeyError> {
    if part.is_empty() {
        return Err(KeyError::EmptyComponent(key.to_owned()));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyError::NotDecimal(key.to_owned()));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(KeyError::LeadingZero(key.to_owned()));
    }
    part.parse::<u32>()
        .map_err(|_| KeyError::Overflow(key.to_owned()))
}
