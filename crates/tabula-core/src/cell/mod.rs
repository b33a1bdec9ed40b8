//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A normalized rectangle of cells (e.g., "A1:B10")
//! - [`CellData`] - Authored cell content: raw text and style
//! - [`CellValue`] - A computed value, as stored in a [`ComputedCache`]

mod address;
mod data;
mod value;

pub use address::{make_ref, parse_ref, CellAddress, CellRange, CellRangeIterator};
pub use data::CellData;
pub use value::{coerce_number, looks_numeric, CellError, CellValue, ComputedCache};
