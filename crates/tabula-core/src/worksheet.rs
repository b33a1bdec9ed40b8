//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellRange};
use crate::error::Result;
use crate::style::CellStyle;
use crate::{DEFAULT_COLS, DEFAULT_ROWS};

/// A worksheet (single sheet in a workbook)
///
/// Cells are stored sparsely: an address is present only while its cell has
/// raw content or a non-default style. Writing an empty cell removes the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Visible row count
    rows: u32,
    /// Visible column count
    cols: u32,
    /// Cell storage, row-major
    cells: BTreeMap<CellAddress, CellData>,
}

impl Worksheet {
    /// Create a new worksheet with the given name and default dimensions
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_size(name, DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Create a new worksheet with explicit dimensions
    pub fn with_size<S: Into<String>>(name: S, rows: u32, cols: u32) -> Self {
        Self {
            name: name.into(),
            rows: rows.max(1),
            cols: cols.max(1),
            cells: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Grow the sheet so it is at least `rows x cols`; never shrinks
    pub fn ensure_size(&mut self, rows: u32, cols: u32) {
        self.rows = self.rows.max(rows);
        self.cols = self.cols.max(cols);
    }

    /// Restore the storage invariants on a sheet built from outside data:
    /// drop empty cells and grow the dimensions to cover every stored cell.
    pub fn normalize(&mut self) {
        self.cells.retain(|_, data| !data.is_empty());
        self.rows = self.rows.max(1);
        self.cols = self.cols.max(1);
        if let Some(used) = self.used_range() {
            self.ensure_size(used.r_max(), used.c_max());
        }
    }

    /// Whether an address lies inside the sheet's dimensions
    pub fn in_bounds(&self, addr: &CellAddress) -> bool {
        addr.row >= 1 && addr.col >= 1 && addr.row <= self.rows && addr.col <= self.cols
    }

    /// The full sheet as a range
    pub fn bounds(&self) -> CellRange {
        CellRange::from_indices(1, 1, self.rows, self.cols)
    }

    // === Cell Access ===

    /// Get a cell by address
    pub fn cell(&self, addr: CellAddress) -> Option<&CellData> {
        self.cells.get(&addr)
    }

    /// Get a cell by row and column numbers
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&CellData> {
        self.cells.get(&CellAddress::new(row, col))
    }

    /// Raw content of a cell, or `""` when the cell is absent
    pub fn raw_at(&self, row: u32, col: u32) -> &str {
        self.cell_at(row, col).map(|c| c.raw.as_str()).unwrap_or("")
    }

    /// Style of a cell, if the cell exists
    pub fn style_at(&self, row: u32, col: u32) -> Option<&CellStyle> {
        self.cell_at(row, col).map(|c| &c.style)
    }

    // === Cell Modification ===

    /// Store a cell, returning what was there before.
    ///
    /// An empty cell removes the entry instead of storing it.
    pub fn set_cell(&mut self, addr: CellAddress, data: CellData) -> Option<CellData> {
        if data.is_empty() {
            self.cells.remove(&addr)
        } else {
            self.cells.insert(addr, data)
        }
    }

    /// Store a cell or remove it (`None`), returning the previous cell
    pub fn put_cell(&mut self, addr: CellAddress, data: Option<CellData>) -> Option<CellData> {
        match data {
            Some(data) => self.set_cell(addr, data),
            None => self.cells.remove(&addr),
        }
    }

    /// Set raw content by address string, keeping the existing style
    pub fn set_raw(&mut self, address: &str, raw: &str) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_raw_at(addr.row, addr.col, raw);
        Ok(())
    }

    /// Set raw content by row and column, keeping the existing style
    pub fn set_raw_at(&mut self, row: u32, col: u32, raw: &str) -> Option<CellData> {
        let addr = CellAddress::new(row, col);
        let style = self.cells.get(&addr).map(|c| c.style.clone()).unwrap_or_default();
        self.set_cell(addr, CellData::with_style(raw, style))
    }

    /// Replace the style of a cell, keeping its raw content
    pub fn set_style_at(&mut self, row: u32, col: u32, style: CellStyle) -> Option<CellData> {
        let addr = CellAddress::new(row, col);
        let raw = self.cells.get(&addr).map(|c| c.raw.clone()).unwrap_or_default();
        self.set_cell(addr, CellData::with_style(raw, style))
    }

    /// Remove a cell entirely
    pub fn remove_cell(&mut self, addr: CellAddress) -> Option<CellData> {
        self.cells.remove(&addr)
    }

    /// Remove every cell inside a range, returning the removed cells
    pub fn clear_range(&mut self, range: &CellRange) -> Vec<(CellAddress, CellData)> {
        let addrs: Vec<CellAddress> = self.cells_in(range).map(|(addr, _)| addr).collect();
        addrs
            .into_iter()
            .filter_map(|addr| self.cells.remove(&addr).map(|data| (addr, data)))
            .collect()
    }

    /// Swap the whole cell map for another, returning the old one
    pub fn replace_cells(
        &mut self,
        cells: BTreeMap<CellAddress, CellData>,
    ) -> BTreeMap<CellAddress, CellData> {
        let cells = cells.into_iter().filter(|(_, c)| !c.is_empty()).collect();
        std::mem::replace(&mut self.cells, cells)
    }

    // === Structural edits ===

    /// Insert an empty row at `at`, shifting that row and everything below down
    pub fn insert_row(&mut self, at: u32) {
        self.remap(|addr| {
            if addr.row >= at {
                Some(CellAddress::new(addr.row + 1, addr.col))
            } else {
                Some(addr)
            }
        });
        self.rows += 1;
    }

    /// Delete row `at`, shifting rows below up; returns the removed cells
    pub fn delete_row(&mut self, at: u32) -> Vec<(CellAddress, CellData)> {
        let removed = self.clear_range(&CellRange::from_indices(at, 1, at, u32::MAX));
        self.remap(|addr| {
            if addr.row > at {
                Some(CellAddress::new(addr.row - 1, addr.col))
            } else {
                Some(addr)
            }
        });
        self.rows = self.rows.saturating_sub(1).max(1);
        removed
    }

    /// Insert an empty column at `at`, shifting that column and everything right of it
    pub fn insert_column(&mut self, at: u32) {
        self.remap(|addr| {
            if addr.col >= at {
                Some(CellAddress::new(addr.row, addr.col + 1))
            } else {
                Some(addr)
            }
        });
        self.cols += 1;
    }

    /// Delete column `at`, shifting columns to its right left; returns the removed cells
    pub fn delete_column(&mut self, at: u32) -> Vec<(CellAddress, CellData)> {
        let removed = self.clear_range(&CellRange::from_indices(1, at, u32::MAX, at));
        self.remap(|addr| {
            if addr.col > at {
                Some(CellAddress::new(addr.row, addr.col - 1))
            } else {
                Some(addr)
            }
        });
        self.cols = self.cols.saturating_sub(1).max(1);
        removed
    }

    fn remap<F>(&mut self, f: F)
    where
        F: Fn(CellAddress) -> Option<CellAddress>,
    {
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter_map(|(addr, data)| f(addr).map(|addr| (addr, data)))
            .collect();
    }

    // === Iteration ===

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cell is stored
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellAddress, &CellData)> {
        self.cells.iter().map(|(addr, data)| (*addr, data))
    }

    /// Iterate over stored cells inside a range
    pub fn cells_in<'a>(
        &'a self,
        range: &CellRange,
    ) -> impl Iterator<Item = (CellAddress, &'a CellData)> + 'a {
        let range = *range;
        self.cells
            .range(range.start..=range.end)
            .filter(move |(addr, _)| range.contains(addr))
            .map(|(addr, data)| (*addr, data))
    }

    /// Iterate over formula cells and their formula text
    pub fn formula_cells(&self) -> impl Iterator<Item = (CellAddress, &str)> {
        self.cells
            .iter()
            .filter(|(_, data)| data.is_formula())
            .map(|(addr, data)| (*addr, data.raw.as_str()))
    }

    /// Bounding rectangle of stored cells, if any
    pub fn used_range(&self) -> Option<CellRange> {
        let mut iter = self.cells.keys();
        let first = iter.next()?;
        let (mut r_min, mut r_max, mut c_min, mut c_max) = (first.row, first.row, first.col, first.col);
        for addr in iter {
            r_min = r_min.min(addr.row);
            r_max = r_max.max(addr.row);
            c_min = c_min.min(addr.col);
            c_max = c_max.max(addr.col);
        }
        Some(CellRange::from_indices(r_min, c_min, r_max, c_max))
    }
}

impl Default for Worksheet {
    fn default() -> Self {
        Self::new("Sheet1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    #[test]
    fn test_new_sheet() {
        let ws = Worksheet::new("Data");
        assert_eq!(ws.name(), "Data");
        assert_eq!((ws.rows(), ws.cols()), (DEFAULT_ROWS, DEFAULT_COLS));
        assert!(ws.is_empty());
    }

    #[test]
    fn test_empty_write_removes_entry() {
        let mut ws = Worksheet::new("S");
        ws.set_raw("A1", "hello").unwrap();
        assert_eq!(ws.cell_count(), 1);

        ws.set_raw("A1", "").unwrap();
        assert_eq!(ws.cell_count(), 0);
        assert!(ws.cell(addr("A1")).is_none());
    }

    #[test]
    fn test_styled_empty_cell_is_kept() {
        let mut ws = Worksheet::new("S");
        ws.set_style_at(1, 1, CellStyle::new().with_bold(true));
        assert_eq!(ws.cell_count(), 1);

        ws.set_raw_at(1, 1, "x");
        assert_eq!(ws.style_at(1, 1).unwrap().bold, Some(true));

        ws.set_raw_at(1, 1, "");
        assert_eq!(ws.cell_count(), 1);

        ws.set_style_at(1, 1, CellStyle::default());
        assert_eq!(ws.cell_count(), 0);
    }

    #[test]
    fn test_clear_range_returns_removed() {
        let mut ws = Worksheet::new("S");
        ws.set_raw("A1", "1").unwrap();
        ws.set_raw("B2", "2").unwrap();
        ws.set_raw("C3", "3").unwrap();

        let removed = ws.clear_range(&CellRange::parse("A1:B2").unwrap());
        assert_eq!(
            removed,
            vec![(addr("A1"), CellData::new("1")), (addr("B2"), CellData::new("2"))]
        );
        assert_eq!(ws.cell_count(), 1);
    }

    #[test]
    fn test_cells_in_skips_other_columns() {
        let mut ws = Worksheet::new("S");
        ws.set_raw("A1", "a").unwrap();
        ws.set_raw("D1", "d").unwrap();
        ws.set_raw("B2", "b").unwrap();

        let found: Vec<_> = ws
            .cells_in(&CellRange::parse("A1:B2").unwrap())
            .map(|(a, _)| a.to_string())
            .collect();
        assert_eq!(found, vec!["A1", "B2"]);
    }

    #[test]
    fn test_used_range() {
        let mut ws = Worksheet::new("S");
        assert_eq!(ws.used_range(), None);

        ws.set_raw("C2", "x").unwrap();
        ws.set_raw("B5", "y").unwrap();
        assert_eq!(ws.used_range(), Some(CellRange::parse("B2:C5").unwrap()));
    }

    #[test]
    fn test_insert_and_delete_row() {
        let mut ws = Worksheet::with_size("S", 5, 5);
        ws.set_raw("A1", "top").unwrap();
        ws.set_raw("A2", "mid").unwrap();
        ws.set_raw("B3", "low").unwrap();

        ws.insert_row(2);
        assert_eq!(ws.rows(), 6);
        assert_eq!(ws.raw_at(1, 1), "top");
        assert_eq!(ws.raw_at(2, 1), "");
        assert_eq!(ws.raw_at(3, 1), "mid");
        assert_eq!(ws.raw_at(4, 2), "low");

        let removed = ws.delete_row(3);
        assert_eq!(removed, vec![(addr("A3"), CellData::new("mid"))]);
        assert_eq!(ws.rows(), 5);
        assert_eq!(ws.raw_at(3, 2), "low");
    }

    #[test]
    fn test_insert_and_delete_column() {
        let mut ws = Worksheet::with_size("S", 5, 3);
        ws.set_raw("A1", "a").unwrap();
        ws.set_raw("B1", "b").unwrap();
        ws.set_raw("C4", "c").unwrap();

        ws.insert_column(1);
        assert_eq!(ws.cols(), 4);
        assert_eq!(ws.raw_at(1, 2), "a");
        assert_eq!(ws.raw_at(1, 3), "b");
        assert_eq!(ws.raw_at(4, 4), "c");

        let removed = ws.delete_column(3);
        assert_eq!(removed, vec![(addr("C1"), CellData::new("b"))]);
        assert_eq!(ws.raw_at(4, 3), "c");
        assert_eq!(ws.cols(), 3);
    }

    #[test]
    fn test_ensure_size_never_shrinks() {
        let mut ws = Worksheet::with_size("S", 10, 10);
        ws.ensure_size(5, 20);
        assert_eq!((ws.rows(), ws.cols()), (10, 20));
    }

    #[test]
    fn test_normalize_grows_to_fit_cells() {
        let mut ws = Worksheet::with_size("S", 2, 2);
        ws.set_raw("C9", "far").unwrap();
        assert!(!ws.in_bounds(&addr("C9")));

        ws.normalize();
        assert_eq!((ws.rows(), ws.cols()), (9, 3));
        assert_eq!(ws.cell_count(), 1);
    }
}
