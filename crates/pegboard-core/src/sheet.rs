//! Bill of materials for the printable pattern sheet.
//!
//! Counts how many pegs of each color a grid uses. Lines follow palette order;
//! ids missing from the palette come last, sorted by id, and carry the
//! fallback color.

use std::collections::BTreeMap;

use crate::grid::CellGrid;
use crate::palette::{Palette, Rgb};

/// Peg count for one color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialLine {
    pub color_id: String,
    /// Palette display name, or the raw id for stale colors.
    pub name: String,
    pub color: Rgb,
    pub count: usize,
    /// Whether the id exists in the palette.
    pub known: bool,
}

/// Per-color peg counts for a grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BillOfMaterials {
    lines: Vec<MaterialLine>,
}

impl BillOfMaterials {
    #[must_use]
    pub fn from_grid(grid: &CellGrid, palette: &Palette) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, id) in grid.iter() {
            *counts.entry(id).or_default() += 1;
        }

        let mut lines: Vec<MaterialLine> = palette
            .iter()
            .filter_map(|entry| {
                counts.remove(entry.id.as_str()).map(|count| MaterialLine {
                    color_id: entry.id.clone(),
                    name: entry.name.clone(),
                    color: entry.color,
                    count,
                    known: true,
                })
            })
            .collect();
        lines.extend(counts.into_iter().map(|(id, count)| MaterialLine {
            color_id: id.to_owned(),
            name: id.to_owned(),
            color: Palette::FALLBACK,
            count,
            known: false,
        }));
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[MaterialLine] {
        &self.lines
    }

    /// Total pegs across all colors.
    #[must_use]
    pub fn total(&self) -> usize {
        self.lines.iter().map(|l| l.count).sum()
    }

    #[must_use]
    pub fn count_of(&self, color_id: &str) -> usize {
        self.lines
            .iter()
            .find(|l| l.color_id == color_id)
            .map_or(0, |l| l.count)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GridPos;

    #[test]
    fn empty_grid_has_no_lines() {
        let bom = BillOfMaterials::from_grid(&CellGrid::empty(), &Palette::default());
        assert!(bom.is_empty());
        assert_eq!(bom.total(), 0);
    }

    #[test]
    fn counts_follow_palette_order_then_unknown() {
        let grid: CellGrid = [
            (GridPos::new(0, 0), "blue".to_string()),
            (GridPos::new(1, 0), "red".to_string()),
            (GridPos::new(2, 0), "blue".to_string()),
            (GridPos::new(3, 0), "zz-stale".to_string()),
            (GridPos::new(4, 0), "aa-stale".to_string()),
        ]
        .into_iter()
        .collect();
        let bom = BillOfMaterials::from_grid(&grid, &Palette::default());
        let ids: Vec<_> = bom.lines().iter().map(|l| l.color_id.as_str()).collect();
        assert_eq!(ids, vec!["red", "blue", "aa-stale", "zz-stale"]);
        assert_eq!(bom.count_of("blue"), 2);
        assert_eq!(bom.count_of("green"), 0);
        assert_eq!(bom.total(), 5);

        let stale = &bom.lines()[2];
        assert!(!stale.known);
        assert_eq!(stale.color, Palette::FALLBACK);
        assert_eq!(bom.lines()[0].name, "Red");
    }
}
