//! # tabula-core
//!
//! Core data structures for the tabula spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout tabula:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing and rectangles
//! - [`CellData`] - The authored content of a cell (raw text plus style)
//! - [`CellValue`] - A computed scalar produced by formula evaluation
//! - [`CellStyle`] - Sparse formatting flags
//! - [`Selection`] - Anchor/active-corner selections
//! - [`Workbook`], [`Worksheet`] - The document structures
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{CellAddress, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.active_sheet_mut();
//!
//! sheet.set_raw_at(1, 1, "Hello");
//! sheet.set_raw("B1", "=A2*2").unwrap();
//!
//! assert_eq!(sheet.raw_at(1, 1), "Hello");
//! assert!(sheet.cell(CellAddress::new(1, 2)).unwrap().is_formula());
//! ```

pub mod cell;
pub mod error;
pub mod selection;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{
    coerce_number, looks_numeric, make_ref, parse_ref, CellAddress, CellData, CellError,
    CellRange, CellValue, ComputedCache,
};
pub use error::{Error, Result};
pub use selection::Selection;
pub use style::{CellStyle, HorizontalAlignment, NumberFormat, StyleFlag};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows addressable in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns addressable in a worksheet
pub const MAX_COLS: u32 = 16_384;

/// Row count of a freshly created sheet
pub const DEFAULT_ROWS: u32 = 100;

/// Column count of a freshly created sheet
pub const DEFAULT_COLS: u32 = 26;
