#![forbid(unsafe_code)]

//! Persistent cell grid snapshots.
//!
//! A [`CellGrid`] maps grid positions to color identifiers; an absent key is
//! an empty hole. The map sits behind an [`Arc`], so cloning a grid is a
//! pointer copy and every edit goes through copy-on-write. A snapshot handed
//! out before an edit never observes that edit.
//!
//! # Invariants
//!
//! 1. Snapshots are never mutated after publication.
//! 2. Grid-producing operations here only create keys that lie on the board
//!    they were given.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::board::BoardSpec;
use crate::coord::{self, GridPos};

/// Immutable snapshot of every filled hole.
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    cells: Arc<BTreeMap<GridPos, String>>,
}

impl PartialEq for CellGrid {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells) || self.cells == other.cells
    }
}

impl Eq for CellGrid {}

impl CellGrid {
    /// A grid with every hole empty.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Color at `pos`, `None` when empty.
    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<&str> {
        self.cells.get(&pos).map(String::as_str)
    }

    /// Number of filled holes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Filled holes, ordered by column then row.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &str)> {
        self.cells.iter().map(|(pos, id)| (*pos, id.as_str()))
    }

    /// Whether two handles share the same underlying storage.
    #[must_use]
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    /// New snapshot identical to this one except at `pos`.
    ///
    /// `None` empties the hole.
    #[must_use]
    pub fn with_cell(&self, pos: GridPos, value: Option<&str>) -> Self {
        let mut next = self.clone();
        let cells = Arc::make_mut(&mut next.cells);
        match value {
            Some(id) => {
                cells.insert(pos, id.to_owned());
            }
            None => {
                cells.remove(&pos);
            }
        }
        next
    }

    /// New snapshot without the cells that fall outside `board`.
    ///
    /// Returns the snapshot and the number of cells dropped.
    #[must_use]
    pub fn clipped_to(&self, board: &BoardSpec) -> (Self, usize) {
        let kept: BTreeMap<GridPos, String> = self
            .cells
            .iter()
            .filter(|(pos, _)| board.contains(**pos))
            .map(|(pos, id)| (*pos, id.clone()))
            .collect();
        let dropped = self.cells.len() - kept.len();
        if dropped == 0 {
            return (self.clone(), 0);
        }
        (
            Self {
                cells: Arc::new(kept),
            },
            dropped,
        )
    }

    /// 4-connected flood fill from `start` with `color`.
    ///
    /// Every hole reachable from `start` through orthogonal steps whose
    /// current value equals the value at `start` (possibly empty) is
    /// recolored, bounded by `board`. Returns `None` when `start` is off the
    /// board or already holds `color`; otherwise the new snapshot and the
    /// number of recolored holes.
    #[must_use]
    pub fn flood_fill(&self, board: &BoardSpec, start: GridPos, color: &str) -> Option<(Self, usize)> {
        if !board.contains(start) {
            return None;
        }
        let target = self.get(start);
        if target == Some(color) {
            return None;
        }

        // Sized by the region, not the board.
        let mut visited = HashSet::from([start]);
        let mut stack = vec![start];
        let mut region = Vec::new();

        while let Some(pos) = stack.pop() {
            region.push(pos);
            for next in pos.orthogonal_neighbors() {
                if !board.contains(next) || self.get(next) != target {
                    continue;
                }
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }

        let mut next = self.clone();
        let cells = Arc::make_mut(&mut next.cells);
        for pos in &region {
            cells.insert(*pos, color.to_owned());
        }
        Some((next, region.len()))
    }

    /// External `"x,y" -> color id` form used by patterns.
    #[must_use]
    pub fn to_key_map(&self) -> BTreeMap<String, String> {
        self.cells
            .iter()
            .map(|(pos, id)| (coord::encode(pos.x, pos.y), id.clone()))
            .collect()
    }

    /// Decode a key map, skipping entries that do not decode or that lie off
    /// `board`.
    ///
    /// Returns the grid and the skipped keys.
    #[must_use]
    pub fn from_key_map<'a, I>(entries: I, board: &BoardSpec) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut cells = BTreeMap::new();
        let mut skipped = Vec::new();
        for (key, id) in entries {
            match coord::decode(key) {
                Ok((x, y)) if board.contains(GridPos::new(x, y)) => {
                    cells.insert(GridPos::new(x, y), id.clone());
                }
                Ok(_) => {
                    tracing::warn!(key = %key, "pattern cell outside board, skipping");
                    skipped.push(key.clone());
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "malformed pattern cell key, skipping");
                    skipped.push(key.clone());
                }
            }
        }
        (
            Self {
                cells: Arc::new(cells),
            },
            skipped,
        )
    }
}

impl FromIterator<(GridPos, String)> for CellGrid {
    fn from_iter<T: IntoIterator<Item = (GridPos, String)>>(iter: T) -> Self {
        Self {
            cells: Arc::new(iter.into_iter().collect()),
        }
    }
}
