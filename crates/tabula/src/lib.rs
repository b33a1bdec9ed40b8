//! # tabula
//!
//! An embeddable spreadsheet engine.
//!
//! Tabula keeps a multi-sheet document of raw cell text, evaluates a small
//! formula language over it and records every edit as an undoable command.
//!
//! ## Features
//!
//! - Arithmetic, `SUM`/`AVERAGE`/`MIN`/`MAX`/`COUNT` and `IF` formulas
//! - Circular references detected per cell (`#CIRCULAR!`)
//! - Bounded undo/redo history
//! - Copy, cut and paste with values-only and formats-only modes
//! - JSON documents and CSV import/export
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let mut engine = SheetEngine::new();
//! engine.set_cell_raw(1, 1, "10");
//! engine.set_cell_raw(2, 1, "32");
//! engine.set_cell_raw(3, 1, "=SUM(A1:A2)");
//! assert_eq!(engine.get_cell_display_value(3, 1), "42");
//!
//! engine.undo();
//! assert_eq!(engine.get_cell_display_value(3, 1), "");
//! ```

pub mod autosum;
pub mod clipboard;
pub mod command;
pub mod display;
pub mod engine;
pub mod error;
pub mod history;
pub mod json;
pub mod prelude;

pub use clipboard::{ClipboardData, PasteMode};
pub use command::Command;
pub use engine::SheetEngine;
pub use error::{Error, Result};
pub use history::{History, MAX_HISTORY};

// Re-export core types
pub use tabula_core::{
    CellAddress, CellData, CellError, CellRange, CellStyle, CellValue, ComputedCache,
    HorizontalAlignment, NumberFormat, Selection, StyleFlag, Workbook, Worksheet, DEFAULT_COLS,
    DEFAULT_ROWS, MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use tabula_formula::{evaluate, recalculate, recalculate_sheet, FormulaError};

// Re-export I/O types
pub use tabula_csv::{
    CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter, LineTerminator,
};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt {
    /// Open a workbook from a `.json` document or a `.csv` file
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook>;

    /// Save the workbook as a `.json` document, or its active sheet's computed values as `.csv`
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();

        match extension(path).as_deref() {
            Some("json") => json::from_json(&std::fs::read_to_string(path)?),
            Some("csv") => {
                let grid = CsvReader::read_file(path, &CsvReadOptions::default())?;

                let mut workbook = Workbook::new();
                let sheet = workbook.active_sheet_mut();
                sheet.replace_cells(grid.cells);
                sheet.ensure_size(grid.rows, grid.cols);
                Ok(workbook)
            }
            _ => Err(unsupported(path)),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        match extension(path).as_deref() {
            Some("json") => Ok(std::fs::write(path, json::to_json(self)?)?),
            Some("csv") => {
                let computed = recalculate(self);
                CsvWriter::write_file(
                    self.active_sheet(),
                    &computed,
                    path,
                    &CsvWriteOptions::default(),
                )?;
                Ok(())
            }
            _ => Err(unsupported(path)),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn unsupported(path: &Path) -> Error {
    tabula_core::Error::other(format!("Unsupported file format: {}", path.display())).into()
}
