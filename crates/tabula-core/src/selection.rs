//! Rectangular selections
//!
//! A selection keeps its anchor (`r1`, `c1`) and active corner (`r2`, `c2`)
//! exactly as the user dragged them. [`Selection::normalize`] derives the
//! top-left/bottom-right rectangle.

use crate::cell::{CellAddress, CellRange};

/// A selection rectangle: anchor plus active corner, not necessarily normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub r1: u32,
    pub c1: u32,
    pub r2: u32,
    pub c2: u32,
}

impl Selection {
    /// Select a single cell
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            r1: row,
            c1: col,
            r2: row,
            c2: col,
        }
    }

    /// Select from an anchor to an active corner
    pub fn span(r1: u32, c1: u32, r2: u32, c2: u32) -> Self {
        Self { r1, c1, r2, c2 }
    }

    /// The anchor cell (where the selection started)
    pub fn anchor(&self) -> CellAddress {
        CellAddress::new(self.r1, self.c1)
    }

    /// The active corner (the end that moves when extending)
    pub fn active_corner(&self) -> CellAddress {
        CellAddress::new(self.r2, self.c2)
    }

    /// Normalized rectangle with min <= max on each axis
    pub fn normalize(&self) -> CellRange {
        CellRange::from_indices(self.r1, self.c1, self.r2, self.c2)
    }

    /// Check if selection is a single cell
    pub fn is_single_cell(&self) -> bool {
        self.r1 == self.r2 && self.c1 == self.c2
    }

    /// Human-readable range string such as `A1:C3`, or `B2` for one cell
    pub fn label(&self) -> String {
        self.normalize().to_a1_string()
    }

    /// Clamp both corners into `[1, rows] x [1, cols]`
    pub fn clamped(&self, rows: u32, cols: u32) -> Self {
        Self {
            r1: clamp(self.r1 as i64, rows),
            c1: clamp(self.c1 as i64, cols),
            r2: clamp(self.r2 as i64, rows),
            c2: clamp(self.c2 as i64, cols),
        }
    }

    /// Move by a row/column delta within a `rows x cols` sheet.
    ///
    /// Without `extend` the selection collapses to the single moved cell. With
    /// `extend` only the active corner moves and the anchor stays put.
    pub fn moved(&self, dr: i64, dc: i64, extend: bool, rows: u32, cols: u32) -> Self {
        let r2 = clamp(self.r2 as i64 + dr, rows);
        let c2 = clamp(self.c2 as i64 + dc, cols);
        if extend {
            Self {
                r1: self.r1,
                c1: self.c1,
                r2,
                c2,
            }
        } else {
            Self::new(r2, c2)
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

fn clamp(value: i64, max: u32) -> u32 {
    value.clamp(1, max.max(1) as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_swaps_each_axis() {
        let sel = Selection::span(5, 1, 2, 3);
        let range = sel.normalize();
        assert_eq!(
            (range.r_min(), range.r_max(), range.c_min(), range.c_max()),
            (2, 5, 1, 3)
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(Selection::span(3, 3, 1, 1).label(), "A1:C3");
        assert_eq!(Selection::new(2, 2).label(), "B2");
    }

    #[test]
    fn test_move_collapses_without_extend() {
        let sel = Selection::span(1, 1, 3, 3);
        assert_eq!(sel.moved(1, 0, false, 10, 10), Selection::new(4, 3));
    }

    #[test]
    fn test_move_extend_keeps_anchor() {
        let sel = Selection::new(2, 2);
        let sel = sel.moved(2, 1, true, 10, 10);
        assert_eq!(sel, Selection::span(2, 2, 4, 3));
        assert_eq!(sel.anchor(), CellAddress::new(2, 2));
    }

    #[test]
    fn test_move_clamps_to_sheet() {
        let sel = Selection::new(1, 1);
        assert_eq!(sel.moved(-1, -5, false, 10, 10), Selection::new(1, 1));
        assert_eq!(sel.moved(50, 50, false, 10, 4), Selection::new(10, 4));
        assert_eq!(
            sel.moved(50, 0, true, 10, 4),
            Selection::span(1, 1, 10, 1)
        );
    }

    #[test]
    fn test_clamped() {
        let sel = Selection::span(0, 30, 200, 2);
        assert_eq!(sel.clamped(100, 26), Selection::span(1, 26, 100, 2));
    }
}
