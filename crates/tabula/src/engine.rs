//! The spreadsheet engine: one document, its computed values and the
//! session state around it (selection, editing, clipboard, history).
//!
//! Every mutation goes through a [`Command`] recorded in the [`History`],
//! after which the active sheet is fully recomputed. Requests that make no
//! sense for the current document (an out-of-range sheet index, deleting the
//! last sheet, pasting with an empty clipboard) are ignored rather than
//! reported.

use log::{debug, warn};
use tabula_core::{
    CellAddress, CellData, CellStyle, CellValue, ComputedCache, Selection, StyleFlag, Workbook,
    Worksheet, MAX_COLS, MAX_ROWS,
};
use tabula_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use tabula_formula::recalculate;

use crate::autosum;
use crate::clipboard::{ClipboardData, PasteMode};
use crate::command::{
    AddSheet, ClearRange, Command, DeleteColumn, DeleteRow, DeleteSheet, InsertColumn, InsertRow,
    RenameSheet, ReplaceDocument, SetCell, SetFormat, SetRange, StyleChange,
};
use crate::display::display_value;
use crate::error::Result;
use crate::history::History;
use crate::json;

/// A spreadsheet document with undo/redo, selection, clipboard and editing state
pub struct SheetEngine {
    workbook: Workbook,
    computed: ComputedCache,
    selection: Selection,
    history: History,
    clipboard: Option<ClipboardData>,
    editing: bool,
    edit_value: String,
}

impl SheetEngine {
    /// Engine over a new blank workbook
    pub fn new() -> Self {
        Self::with_workbook(Workbook::new())
    }

    /// Engine over an existing workbook
    pub fn with_workbook(workbook: Workbook) -> Self {
        Self::with_history(workbook, History::new())
    }

    /// Engine with a caller-supplied history (e.g. a different bound)
    pub fn with_history(workbook: Workbook, history: History) -> Self {
        let computed = recalculate(&workbook);
        Self {
            workbook,
            computed,
            selection: Selection::default(),
            history,
            clipboard: None,
            editing: false,
            edit_value: String::new(),
        }
    }

    // === Read accessors ===

    /// The current document
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// The active sheet
    pub fn active_sheet(&self) -> &Worksheet {
        self.workbook.active_sheet()
    }

    /// Computed values of the active sheet
    pub fn computed(&self) -> &ComputedCache {
        &self.computed
    }

    pub fn get_cell(&self, row: u32, col: u32) -> Option<&CellData> {
        self.active_sheet().cell_at(row, col)
    }

    /// Style of a cell; absent cells have the default style
    pub fn get_cell_style(&self, row: u32, col: u32) -> CellStyle {
        self.active_sheet()
            .style_at(row, col)
            .cloned()
            .unwrap_or_default()
    }

    /// Computed value of a cell, if it holds anything
    pub fn get_cell_value(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.computed.get(&CellAddress::new(row, col))
    }

    /// What the cell shows: computed value with its number format applied
    pub fn get_cell_display_value(&self, row: u32, col: u32) -> String {
        display_value(self.active_sheet(), &self.computed, row, col)
    }

    // === Write operations ===

    /// Set a cell's raw content on the active sheet, keeping its style.
    ///
    /// Writes outside the sheet and writes that change nothing are ignored.
    pub fn set_cell_raw(&mut self, row: u32, col: u32, raw: &str) {
        let addr = CellAddress::new(row, col);
        let sheet = self.active_sheet();
        if !sheet.in_bounds(&addr) {
            debug!("ignoring write to {} outside '{}'", addr, sheet.name());
            return;
        }
        if sheet.raw_at(row, col) == raw {
            return;
        }

        let style = sheet.style_at(row, col).cloned().unwrap_or_default();
        let data = CellData::with_style(raw, style);
        let index = self.workbook.active_index();
        self.execute(SetCell::new(index, addr, Some(data)));
    }

    /// Overlay a partial style onto every cell of the selection
    pub fn apply_style(&mut self, partial: CellStyle) {
        if partial.is_default() {
            return;
        }
        let range = self.selection.normalize();
        let index = self.workbook.active_index();
        self.execute(SetFormat::new(index, range, StyleChange::Apply(partial)));
    }

    /// Toggle a flag across the selection: off if every cell has it, on otherwise
    pub fn toggle_style(&mut self, flag: StyleFlag) {
        let range = self.selection.normalize();
        let index = self.workbook.active_index();
        self.execute(SetFormat::new(index, range, StyleChange::Toggle(flag)));
    }

    /// Remove content and style from every cell of the selection
    pub fn clear_selection(&mut self) {
        self.clear_range("Clear");
    }

    fn clear_range(&mut self, label: &str) {
        let range = self.selection.normalize();
        if self.active_sheet().cells_in(&range).next().is_none() {
            return;
        }
        let index = self.workbook.active_index();
        self.execute(ClearRange::new(index, range, label));
    }

    // === Selection ===

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the selection, clamped to the active sheet
    pub fn set_selection(&mut self, selection: Selection) {
        let sheet = self.workbook.active_sheet();
        self.selection = selection.clamped(sheet.rows(), sheet.cols());
    }

    /// Move the active corner; without `extend` the selection collapses to it
    pub fn move_selection(&mut self, dr: i64, dc: i64, extend: bool) {
        let sheet = self.workbook.active_sheet();
        self.selection = self
            .selection
            .moved(dr, dc, extend, sheet.rows(), sheet.cols());
    }

    /// Label of the selection such as `A1:C3`
    pub fn selection_label(&self) -> String {
        self.selection.label()
    }

    // === Editing session ===

    /// Begin editing the anchor cell, seeded with `initial` or the cell's raw content
    pub fn start_editing(&mut self, initial: Option<&str>) {
        let anchor = self.selection.anchor();
        self.edit_value = match initial {
            Some(value) => value.to_string(),
            None => self.active_sheet().raw_at(anchor.row, anchor.col).to_string(),
        };
        self.editing = true;
    }

    /// Replace the text being edited
    pub fn set_edit_value(&mut self, value: &str) {
        if self.editing {
            self.edit_value = value.to_string();
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn edit_value(&self) -> &str {
        &self.edit_value
    }

    /// End the editing session, writing the edited text to the anchor cell if `commit`
    pub fn finish_editing(&mut self, commit: bool) {
        if !self.editing {
            return;
        }
        self.editing = false;
        let value = std::mem::take(&mut self.edit_value);

        if commit {
            let anchor = self.selection.anchor();
            self.set_cell_raw(anchor.row, anchor.col, &value);
        }
    }

    // === Clipboard ===

    /// Capture the selection; a cut also clears it
    pub fn copy(&mut self, cut: bool) {
        let range = self.selection.normalize();
        let index = self.workbook.active_index();
        self.clipboard = Some(ClipboardData::capture(
            self.active_sheet(),
            range,
            cut,
            index,
        ));

        if cut {
            self.clear_range("Cut");
        }
    }

    /// Paste the clipboard with its top-left at the selection's top-left.
    ///
    /// Cells that would land outside the sheet are dropped. A cut clipboard
    /// is emptied by the first paste.
    pub fn paste(&mut self, mode: PasteMode) {
        let target = self.selection.normalize().start;
        let (mut writes, is_cut) = match &self.clipboard {
            Some(clip) => (
                clip.paste_into(self.workbook.active_sheet(), target, mode),
                clip.is_cut,
            ),
            None => return,
        };

        if is_cut {
            self.clipboard = None;
        }

        let sheet = self.workbook.active_sheet();
        writes.retain(|(addr, data)| sheet.cell(*addr) != data.as_ref());
        if writes.is_empty() {
            return;
        }

        let index = self.workbook.active_index();
        self.execute(SetRange::new(index, writes, format!("Paste {}", mode)));
    }

    pub fn clipboard(&self) -> Option<&ClipboardData> {
        self.clipboard.as_ref()
    }

    // === History ===

    /// Undo the last change; returns whether anything was undone
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.workbook).unwrap_or_else(|e| {
            warn!("undo failed: {}", e);
            false
        });
        if undone {
            self.refresh();
        }
        undone
    }

    /// Redo the last undone change; returns whether anything was redone
    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.workbook).unwrap_or_else(|e| {
            warn!("redo failed: {}", e);
            false
        });
        if redone {
            self.refresh();
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.history.redo_description()
    }

    // === Sheet management ===

    /// Append a blank sheet and switch to it; the default name is `Sheet<n+1>`
    pub fn add_sheet(&mut self, name: Option<&str>) {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.workbook.next_sheet_name(),
        };
        self.execute(AddSheet::new(name));
        self.selection = Selection::default();
    }

    /// Rename a sheet; names need not be unique
    pub fn rename_sheet(&mut self, index: usize, name: &str) {
        if index >= self.workbook.sheet_count() {
            return;
        }
        self.execute(RenameSheet::new(index, name));
    }

    /// Delete a sheet. The last remaining sheet is never deleted.
    pub fn delete_sheet(&mut self, index: usize) {
        let count = self.workbook.sheet_count();
        if count <= 1 || index >= count {
            return;
        }
        self.execute(DeleteSheet::new(index));
    }

    /// Switch the active sheet and reset the selection to `A1`
    pub fn set_active_sheet(&mut self, index: usize) {
        if self.workbook.set_active_sheet(index).is_err() {
            return;
        }
        self.selection = Selection::default();
        self.refresh();
    }

    // === Structure ===

    /// Insert an empty row before `at` (up to one past the last row)
    pub fn insert_row(&mut self, at: u32) {
        let rows = self.active_sheet().rows();
        if at == 0 || at > rows + 1 || rows >= MAX_ROWS {
            return;
        }
        let index = self.workbook.active_index();
        self.execute(InsertRow::new(index, at));
    }

    /// Delete row `at`; the only row of a sheet is never deleted
    pub fn delete_row(&mut self, at: u32) {
        let rows = self.active_sheet().rows();
        if at == 0 || at > rows || rows <= 1 {
            return;
        }
        let index = self.workbook.active_index();
        self.execute(DeleteRow::new(index, at));
    }

    /// Insert an empty column before `at` (up to one past the last column)
    pub fn insert_column(&mut self, at: u32) {
        let cols = self.active_sheet().cols();
        if at == 0 || at > cols + 1 || cols >= MAX_COLS {
            return;
        }
        let index = self.workbook.active_index();
        self.execute(InsertColumn::new(index, at));
    }

    /// Delete column `at`; the only column of a sheet is never deleted
    pub fn delete_column(&mut self, at: u32) {
        let cols = self.active_sheet().cols();
        if at == 0 || at > cols || cols <= 1 {
            return;
        }
        let index = self.workbook.active_index();
        self.execute(DeleteColumn::new(index, at));
    }

    // === Auto-sum ===

    /// Insert `=SUM(...)` formulas for the selection; returns whether any were written
    pub fn auto_sum(&mut self) -> bool {
        let sheet = self.active_sheet();
        let writes: Vec<_> = autosum::auto_sum(sheet, &self.selection)
            .into_iter()
            .map(|(addr, formula)| {
                let style = sheet.cell(addr).map(|c| c.style.clone()).unwrap_or_default();
                (addr, Some(CellData::with_style(formula, style)))
            })
            .collect();
        if writes.is_empty() {
            return false;
        }

        let index = self.workbook.active_index();
        self.execute(SetRange::new(index, writes, "Auto-sum"));
        true
    }

    // === Serialization ===

    /// The whole workbook as JSON
    pub fn export_json(&self) -> Result<String> {
        json::to_json(&self.workbook)
    }

    /// Replace the workbook with a JSON document.
    ///
    /// On success the history is cleared: the import is a new baseline. On
    /// failure nothing changes and `false` is returned.
    pub fn import_json(&mut self, text: &str) -> bool {
        match json::from_json(text) {
            Ok(workbook) => {
                self.workbook = workbook;
                self.history.clear();
                self.selection = Selection::default();
                self.editing = false;
                self.edit_value.clear();
                self.refresh();
                true
            }
            Err(e) => {
                warn!("rejected JSON import: {}", e);
                false
            }
        }
    }

    /// The active sheet's used range as CSV of computed values
    pub fn export_csv(&self) -> Result<String> {
        Ok(CsvWriter::write_string(
            self.active_sheet(),
            &self.computed,
            &CsvWriteOptions::default(),
        )?)
    }

    /// Replace every cell of the active sheet with CSV content.
    ///
    /// The sheet grows to fit the data and empty fields leave no cells.
    /// Undoable as a single step. Input without records is ignored and
    /// returns `false`.
    pub fn import_csv(&mut self, text: &str) -> bool {
        let grid = match CsvReader::read_str(text, &CsvReadOptions::default()) {
            Ok(grid) => grid,
            Err(e) => {
                warn!("rejected CSV import: {}", e);
                return false;
            }
        };
        if grid.is_empty() {
            return false;
        }

        let mut document = self.workbook.clone();
        let sheet = document.active_sheet_mut();
        sheet.replace_cells(grid.cells);
        sheet.ensure_size(grid.rows, grid.cols);

        self.execute(ReplaceDocument::new(document, "Import CSV"));
        true
    }

    // === Internals ===

    fn execute<C: Command + 'static>(&mut self, command: C) {
        if let Err(e) = self.history.execute(Box::new(command), &mut self.workbook) {
            warn!("command failed: {}", e);
            return;
        }
        self.refresh();
    }

    /// Recompute the active sheet and keep the selection inside it
    fn refresh(&mut self) {
        let sheet = self.workbook.active_sheet();
        self.selection = self.selection.clamped(sheet.rows(), sheet.cols());
        self.computed = recalculate(&self.workbook);
    }
}

impl Default for SheetEngine {
    fn default() -> Self {
        Self::new()
    }
}
