//! Undoable document edits
//!
//! Every mutation of a [`Workbook`] made through the engine is a [`Command`].
//! A command captures whatever it needs to invert itself while it applies,
//! so `revert` after `apply` restores the document exactly and `apply` after
//! `revert` repeats the edit.

use crate::error::Result;
use tabula_core::{
    CellAddress, CellData, CellRange, CellStyle, Error as CoreError, StyleFlag, Workbook,
    Worksheet,
};

/// A reversible edit of a workbook
pub trait Command {
    /// Perform the edit, recording the data needed to revert it
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()>;

    /// Undo a previous `apply`
    fn revert(&mut self, workbook: &mut Workbook) -> Result<()>;

    /// Human-readable label for undo/redo affordances
    fn description(&self) -> String;
}

fn sheet_mut(workbook: &mut Workbook, index: usize) -> Result<&mut Worksheet> {
    let count = workbook.sheet_count();
    workbook
        .worksheet_mut(index)
        .ok_or_else(|| CoreError::SheetOutOfBounds(index, count).into())
}

/// Write a batch of cells, returning what each address held before.
///
/// `None` removes the cell.
fn write_cells(
    sheet: &mut Worksheet,
    cells: &[(CellAddress, Option<CellData>)],
) -> Vec<(CellAddress, Option<CellData>)> {
    cells
        .iter()
        .map(|(addr, data)| (*addr, sheet.put_cell(*addr, data.clone())))
        .collect()
}

/// Restore cells captured by [`write_cells`], last write first
fn restore_cells(sheet: &mut Worksheet, previous: &[(CellAddress, Option<CellData>)]) {
    for (addr, data) in previous.iter().rev() {
        sheet.put_cell(*addr, data.clone());
    }
}

// === Cell content ===

/// Set (or remove) one cell
#[derive(Debug, Clone)]
pub struct SetCell {
    sheet: usize,
    addr: CellAddress,
    data: Option<CellData>,
    previous: Option<CellData>,
}

impl SetCell {
    pub fn new(sheet: usize, addr: CellAddress, data: Option<CellData>) -> Self {
        Self {
            sheet,
            addr,
            data,
            previous: None,
        }
    }
}

impl Command for SetCell {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;
        self.previous = sheet.put_cell(self.addr, self.data.clone());
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;
        sheet.put_cell(self.addr, self.previous.clone());
        Ok(())
    }

    fn description(&self) -> String {
        format!("Edit {}", self.addr)
    }
}

/// Write several cells as one undoable step (paste, auto-sum)
#[derive(Debug, Clone)]
pub struct SetRange {
    sheet: usize,
    cells: Vec<(CellAddress, Option<CellData>)>,
    previous: Vec<(CellAddress, Option<CellData>)>,
    label: String,
}

impl SetRange {
    pub fn new<S: Into<String>>(
        sheet: usize,
        cells: Vec<(CellAddress, Option<CellData>)>,
        label: S,
    ) -> Self {
        Self {
            sheet,
            cells,
            previous: Vec::new(),
            label: label.into(),
        }
    }
}

impl Command for SetRange {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;
        self.previous = write_cells(sheet, &self.cells);
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;
        restore_cells(sheet, &self.previous);
        Ok(())
    }

    fn description(&self) -> String {
        self.label.clone()
    }
}

/// Remove raw content and style from every cell in a range
#[derive(Debug, Clone)]
pub struct ClearRange {
    sheet: usize,
    range: CellRange,
    removed: Vec<(CellAddress, CellData)>,
    label: String,
}

impl ClearRange {
    pub fn new<S: Into<String>>(sheet: usize, range: CellRange, label: S) -> Self {
        Self {
            sheet,
            range,
            removed: Vec::new(),
            label: label.into(),
        }
    }
}

impl Command for ClearRange {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;
        self.removed = sheet.clear_range(&self.range);
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;
        for (addr, data) in &self.removed {
            sheet.set_cell(*addr, data.clone());
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("{} {}", self.label, self.range)
    }
}

// === Formatting ===

/// How a [`SetFormat`] changes each cell's style
#[derive(Debug, Clone, PartialEq)]
pub enum StyleChange {
    /// Overlay the fields set in a partial style
    Apply(CellStyle),
    /// Turn a flag off if every cell has it, on otherwise
    Toggle(StyleFlag),
}

/// Change the style of every cell in a range, keeping raw content
#[derive(Debug, Clone)]
pub struct SetFormat {
    sheet: usize,
    range: CellRange,
    change: StyleChange,
    previous: Vec<(CellAddress, Option<CellData>)>,
}

impl SetFormat {
    pub fn new(sheet: usize, range: CellRange, change: StyleChange) -> Self {
        Self {
            sheet,
            range,
            change,
            previous: Vec::new(),
        }
    }
}

impl Command for SetFormat {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;

        let toggle_on = match &self.change {
            StyleChange::Toggle(flag) => !self
                .range
                .cells()
                .all(|addr| sheet.cell(addr).map_or(false, |c| c.style.flag(*flag))),
            StyleChange::Apply(_) => false,
        };

        let cells: Vec<_> = self
            .range
            .cells()
            .map(|addr| {
                let mut data = sheet.cell(addr).cloned().unwrap_or_default();
                match &self.change {
                    StyleChange::Apply(partial) => data.style.merge(partial),
                    StyleChange::Toggle(flag) => data.style.set_flag(*flag, toggle_on),
                }
                (addr, Some(data))
            })
            .collect();

        self.previous = write_cells(sheet, &cells);
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;
        restore_cells(sheet, &self.previous);
        Ok(())
    }

    fn description(&self) -> String {
        match &self.change {
            StyleChange::Apply(_) => format!("Format {}", self.range),
            StyleChange::Toggle(flag) => format!("Toggle {:?} {}", flag, self.range),
        }
    }
}

// === Structure ===

/// Insert an empty row
#[derive(Debug, Clone)]
pub struct InsertRow {
    sheet: usize,
    at: u32,
}

impl InsertRow {
    pub fn new(sheet: usize, at: u32) -> Self {
        Self { sheet, at }
    }
}

impl Command for InsertRow {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        sheet_mut(workbook, self.sheet)?.insert_row(self.at);
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        sheet_mut(workbook, self.sheet)?.delete_row(self.at);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Insert row {}", self.at)
    }
}

/// Delete a row, keeping its contents for reinsertion
#[derive(Debug, Clone)]
pub struct DeleteRow {
    sheet: usize,
    at: u32,
    removed: Vec<(CellAddress, CellData)>,
}

impl DeleteRow {
    pub fn new(sheet: usize, at: u32) -> Self {
        Self {
            sheet,
            at,
            removed: Vec::new(),
        }
    }
}

impl Command for DeleteRow {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        self.removed = sheet_mut(workbook, self.sheet)?.delete_row(self.at);
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;
        sheet.insert_row(self.at);
        for (addr, data) in &self.removed {
            sheet.set_cell(*addr, data.clone());
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete row {}", self.at)
    }
}

/// Insert an empty column
#[derive(Debug, Clone)]
pub struct InsertColumn {
    sheet: usize,
    at: u32,
}

impl InsertColumn {
    pub fn new(sheet: usize, at: u32) -> Self {
        Self { sheet, at }
    }
}

impl Command for InsertColumn {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        sheet_mut(workbook, self.sheet)?.insert_column(self.at);
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        sheet_mut(workbook, self.sheet)?.delete_column(self.at);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Insert column {}", CellAddress::column_to_letters(self.at))
    }
}

/// Delete a column, keeping its contents for reinsertion
#[derive(Debug, Clone)]
pub struct DeleteColumn {
    sheet: usize,
    at: u32,
    removed: Vec<(CellAddress, CellData)>,
}

impl DeleteColumn {
    pub fn new(sheet: usize, at: u32) -> Self {
        Self {
            sheet,
            at,
            removed: Vec::new(),
        }
    }
}

impl Command for DeleteColumn {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        self.removed = sheet_mut(workbook, self.sheet)?.delete_column(self.at);
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        let sheet = sheet_mut(workbook, self.sheet)?;
        sheet.insert_column(self.at);
        for (addr, data) in &self.removed {
            sheet.set_cell(*addr, data.clone());
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete column {}", CellAddress::column_to_letters(self.at))
    }
}

// === Sheets ===

/// Append a blank sheet and make it active
#[derive(Debug, Clone)]
pub struct AddSheet {
    name: String,
    previous_active: usize,
}

impl AddSheet {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            previous_active: 0,
        }
    }
}

impl Command for AddSheet {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        self.previous_active = workbook.active_index();
        let index = workbook.add_worksheet(Worksheet::new(self.name.as_str()));
        workbook.set_active_sheet(index)?;
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        workbook.remove_worksheet(workbook.sheet_count() - 1)?;
        workbook.set_active_sheet(self.previous_active)?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Add sheet {}", self.name)
    }
}

/// Rename a sheet
#[derive(Debug, Clone)]
pub struct RenameSheet {
    sheet: usize,
    name: String,
    previous: String,
}

impl RenameSheet {
    pub fn new<S: Into<String>>(sheet: usize, name: S) -> Self {
        Self {
            sheet,
            name: name.into(),
            previous: String::new(),
        }
    }
}

impl Command for RenameSheet {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        self.previous = workbook.rename_worksheet(self.sheet, &self.name)?;
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        workbook.rename_worksheet(self.sheet, &self.previous)?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Rename sheet to {}", self.name)
    }
}

/// Delete a sheet, keeping it for reinsertion
#[derive(Debug, Clone)]
pub struct DeleteSheet {
    sheet: usize,
    name: String,
    removed: Option<Worksheet>,
    previous_active: usize,
}

impl DeleteSheet {
    pub fn new(sheet: usize) -> Self {
        Self {
            sheet,
            name: String::new(),
            removed: None,
            previous_active: 0,
        }
    }
}

impl Command for DeleteSheet {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        self.previous_active = workbook.active_index();
        let removed = workbook.remove_worksheet(self.sheet)?;
        self.name = removed.name().to_string();
        self.removed = Some(removed);
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        if let Some(sheet) = self.removed.take() {
            workbook.insert_worksheet(self.sheet, sheet)?;
        }
        workbook.set_active_sheet(self.previous_active)?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete sheet {}", self.name)
    }
}

// === Whole document ===

/// Swap in a whole new document; reverting swaps the old one back.
///
/// Used for bulk edits such as CSV import where a precise inverse is not
/// worth computing.
#[derive(Debug, Clone)]
pub struct ReplaceDocument {
    document: Workbook,
    label: String,
}

impl ReplaceDocument {
    pub fn new<S: Into<String>>(document: Workbook, label: S) -> Self {
        Self {
            document,
            label: label.into(),
        }
    }
}

impl Command for ReplaceDocument {
    fn apply(&mut self, workbook: &mut Workbook) -> Result<()> {
        std::mem::swap(workbook, &mut self.document);
        Ok(())
    }

    fn revert(&mut self, workbook: &mut Workbook) -> Result<()> {
        std::mem::swap(workbook, &mut self.document);
        Ok(())
    }

    fn description(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn workbook() -> Workbook {
        let mut wb = Workbook::new();
        let sheet = wb.active_sheet_mut();
        sheet.set_raw("A1", "1").unwrap();
        sheet.set_raw("A2", "2").unwrap();
        sheet.set_raw("B2", "=A1+A2").unwrap();
        sheet.set_style_at(3, 3, CellStyle::new().with_bold(true));
        wb
    }

    /// Apply, revert, re-apply: the document must match at each step
    fn check_inverse(mut command: impl Command) {
        let before = workbook();
        let mut wb = before.clone();

        command.apply(&mut wb).unwrap();
        let after = wb.clone();
        assert_ne!(after, before, "{} changed nothing", command.description());

        command.revert(&mut wb).unwrap();
        assert_eq!(wb, before);

        command.apply(&mut wb).unwrap();
        assert_eq!(wb, after);
    }

    #[test]
    fn test_cell_commands_invert() {
        check_inverse(SetCell::new(0, CellAddress::new(1, 1), Some(CellData::new("9"))));
        check_inverse(SetCell::new(0, CellAddress::new(5, 5), Some(CellData::new("new"))));
        check_inverse(SetCell::new(0, CellAddress::new(1, 1), None));
        check_inverse(SetRange::new(
            0,
            vec![
                (CellAddress::new(1, 1), Some(CellData::new("x"))),
                (CellAddress::new(1, 1), Some(CellData::new("y"))),
                (CellAddress::new(9, 1), None),
                (CellAddress::new(2, 1), None),
            ],
            "Paste",
        ));
        check_inverse(ClearRange::new(0, CellRange::from_indices(1, 1, 3, 3), "Clear"));
    }

    #[test]
    fn test_format_commands_invert() {
        check_inverse(SetFormat::new(
            0,
            CellRange::from_indices(1, 1, 2, 2),
            StyleChange::Apply(CellStyle::new().with_italic(true)),
        ));
        check_inverse(SetFormat::new(
            0,
            CellRange::from_indices(3, 3, 3, 3),
            StyleChange::Toggle(StyleFlag::Bold),
        ));
    }

    #[test]
    fn test_structure_commands_invert() {
        check_inverse(InsertRow::new(0, 1));
        check_inverse(DeleteRow::new(0, 2));
        check_inverse(InsertColumn::new(0, 1));
        check_inverse(DeleteColumn::new(0, 1));
    }

    #[test]
    fn test_sheet_commands_invert() {
        check_inverse(AddSheet::new("Sheet2"));
        check_inverse(RenameSheet::new(0, "Data"));
        check_inverse(ReplaceDocument::new(Workbook::new(), "Import CSV"));

        let mut wb = workbook();
        wb.add_worksheet(Worksheet::new("Second"));
        wb.set_active_sheet(1).unwrap();
        let before = wb.clone();

        let mut command = DeleteSheet::new(0);
        command.apply(&mut wb).unwrap();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(command.description(), "Delete sheet Sheet1");
        command.revert(&mut wb).unwrap();
        assert_eq!(wb, before);
    }

    #[test]
    fn test_toggle_turns_off_only_when_all_set() {
        let mut wb = workbook();
        let range = CellRange::from_indices(3, 3, 3, 4);

        // C3 is bold, D3 is not: toggling sets both
        SetFormat::new(0, range, StyleChange::Toggle(StyleFlag::Bold))
            .apply(&mut wb)
            .unwrap();
        let sheet = wb.active_sheet();
        assert!(sheet.style_at(3, 4).map_or(false, |s| s.flag(StyleFlag::Bold)));

        // Now both are bold: toggling clears both, and the cells disappear
        SetFormat::new(0, range, StyleChange::Toggle(StyleFlag::Bold))
            .apply(&mut wb)
            .unwrap();
        let sheet = wb.active_sheet();
        assert!(sheet.cell_at(3, 3).is_none());
        assert!(sheet.cell_at(3, 4).is_none());
    }

    #[test]
    fn test_missing_sheet_is_an_error() {
        let mut wb = workbook();
        assert!(SetCell::new(4, CellAddress::new(1, 1), None)
            .apply(&mut wb)
            .is_err());
    }
}
