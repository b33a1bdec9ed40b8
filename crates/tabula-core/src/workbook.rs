//! Workbook type - the main document structure

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;

/// A workbook (spreadsheet document)
///
/// Always holds at least one worksheet, and `active` always indexes one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Workbook {
    /// Worksheets in the workbook
    sheets: Vec<Worksheet>,
    /// Active sheet index
    active: usize,
}

impl Workbook {
    /// Create a new workbook with one blank worksheet
    pub fn new() -> Self {
        Self {
            sheets: vec![Worksheet::new("Sheet1")],
            active: 0,
        }
    }

    /// Build a workbook from existing sheets.
    ///
    /// Fails when `sheets` is empty; an out-of-range `active` clamps to the last sheet.
    pub fn from_sheets(sheets: Vec<Worksheet>, active: usize) -> Result<Self> {
        if sheets.is_empty() {
            return Err(Error::other("a workbook needs at least one sheet"));
        }
        let active = active.min(sheets.len() - 1);
        Ok(Self { sheets, active })
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.sheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.sheets.get_mut(index)
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.sheets.iter()
    }

    /// Get the active sheet index
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Get the active worksheet
    pub fn active_sheet(&self) -> &Worksheet {
        &self.sheets[self.active]
    }

    /// Get the active worksheet mutably
    pub fn active_sheet_mut(&mut self) -> &mut Worksheet {
        &mut self.sheets[self.active]
    }

    /// Set the active sheet index
    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.sheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.sheets.len()));
        }
        self.active = index;
        Ok(())
    }

    /// Default name for the next appended sheet, derived from the sheet count
    pub fn next_sheet_name(&self) -> String {
        format!("Sheet{}", self.sheets.len() + 1)
    }

    /// Append a worksheet, returning its index
    pub fn add_worksheet(&mut self, worksheet: Worksheet) -> usize {
        self.sheets.push(worksheet);
        self.sheets.len() - 1
    }

    /// Insert a worksheet at a specific index, keeping the active sheet the same sheet
    pub fn insert_worksheet(&mut self, index: usize, worksheet: Worksheet) -> Result<()> {
        if index > self.sheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.sheets.len()));
        }

        self.sheets.insert(index, worksheet);

        if self.active >= index && self.sheets.len() > 1 {
            self.active += 1;
        }

        Ok(())
    }

    /// Remove a worksheet by index.
    ///
    /// The last remaining sheet cannot be removed. If the active index falls
    /// past the end it clamps to the new last sheet.
    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.sheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.sheets.len()));
        }
        if self.sheets.len() == 1 {
            return Err(Error::LastSheet);
        }

        let worksheet = self.sheets.remove(index);

        if self.active >= self.sheets.len() {
            self.active = self.sheets.len() - 1;
        }

        Ok(worksheet)
    }

    /// Rename a worksheet; names need not be unique
    pub fn rename_worksheet(&mut self, index: usize, new_name: &str) -> Result<String> {
        let count = self.sheets.len();
        let sheet = self
            .sheets
            .get_mut(index)
            .ok_or(Error::SheetOutOfBounds(index, count))?;
        let old = sheet.name().to_string();
        sheet.set_name(new_name);
        Ok(old)
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.active_index(), 0);
        assert_eq!(wb.active_sheet().name(), "Sheet1");
    }

    #[test]
    fn test_from_sheets_requires_a_sheet() {
        assert!(Workbook::from_sheets(Vec::new(), 0).is_err());

        let wb = Workbook::from_sheets(vec![Worksheet::new("A"), Worksheet::new("B")], 9).unwrap();
        assert_eq!(wb.active_index(), 1);
    }

    #[test]
    fn test_add_worksheets() {
        let mut wb = Workbook::new();
        assert_eq!(wb.next_sheet_name(), "Sheet2");

        let idx = wb.add_worksheet(Worksheet::new("Data"));
        assert_eq!(idx, 1);
        assert_eq!(wb.sheet_count(), 2);
        assert_eq!(wb.sheet_index("Data"), Some(1));
        assert_eq!(wb.next_sheet_name(), "Sheet3");
    }

    #[test]
    fn test_remove_last_sheet_refused() {
        let mut wb = Workbook::new();
        assert!(matches!(wb.remove_worksheet(0), Err(Error::LastSheet)));
        assert_eq!(wb.sheet_count(), 1);
    }

    #[test]
    fn test_remove_active_clamps() {
        let mut wb = Workbook::new();
        wb.add_worksheet(Worksheet::new("B"));
        wb.add_worksheet(Worksheet::new("C"));
        wb.set_active_sheet(2).unwrap();

        wb.remove_worksheet(2).unwrap();
        assert_eq!(wb.active_index(), 1);
        assert_eq!(wb.active_sheet().name(), "B");
    }

    #[test]
    fn test_insert_keeps_active_sheet() {
        let mut wb = Workbook::new();
        wb.add_worksheet(Worksheet::new("B"));
        wb.set_active_sheet(1).unwrap();

        wb.insert_worksheet(0, Worksheet::new("Z")).unwrap();
        assert_eq!(wb.active_sheet().name(), "B");
    }

    #[test]
    fn test_rename_allows_duplicates() {
        let mut wb = Workbook::new();
        wb.add_worksheet(Worksheet::new("B"));
        let old = wb.rename_worksheet(1, "Sheet1").unwrap();
        assert_eq!(old, "B");
        assert_eq!(wb.worksheet(1).unwrap().name(), "Sheet1");
        assert!(matches!(
            wb.rename_worksheet(5, "X"),
            Err(Error::SheetOutOfBounds(5, 2))
        ));
        assert_eq!(wb.worksheet(0).unwrap().name(), "Sheet1");
    }

    #[test]
    fn test_set_active_out_of_range() {
        let mut wb = Workbook::new();
        assert!(wb.set_active_sheet(3).is_err());
        assert_eq!(wb.active_index(), 0);
    }
}
