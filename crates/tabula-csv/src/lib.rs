//! # tabula-csv
//!
//! CSV reader and writer for tabula.
//!
//! Reading produces a [`CsvGrid`] of raw cell text; writing emits the computed
//! value of every cell in a sheet's used range.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::{CsvGrid, CsvReader};
pub use writer::CsvWriter;
