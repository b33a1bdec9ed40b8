//! Prelude module - common imports for tabula users
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    CellAddress,
    CellData,
    CellError,
    CellRange,
    // Style types
    CellStyle,
    // Cell types
    CellValue,
    CsvReader,
    CsvWriter,
    // Error types
    Error,
    HorizontalAlignment,
    NumberFormat,
    PasteMode,
    Result,
    Selection,
    // Engine
    SheetEngine,
    StyleFlag,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    Worksheet,
};
