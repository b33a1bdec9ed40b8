//! # tabula-formula
//!
//! Formula evaluation for tabula.
//!
//! This crate provides:
//! - Arithmetic parsing (text → AST)
//! - Formula evaluation with circular-reference protection
//! - The aggregate functions (`SUM`, `AVERAGE`, `MIN`, `MAX`, `COUNT`) and `IF`
//! - Full recompute of a sheet's computed values
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{CellAddress, CellValue, Workbook};
//! use tabula_formula::recalculate;
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.active_sheet_mut();
//! sheet.set_raw("A1", "1").unwrap();
//! sheet.set_raw("A2", "2").unwrap();
//! sheet.set_raw("A3", "=SUM(A1:A2)").unwrap();
//!
//! let cache = recalculate(&workbook);
//! assert_eq!(cache[&CellAddress::new(3, 1)], CellValue::Number(3.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod recalc;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, Evaluator, MAX_DEPTH};
pub use functions::{Accumulator, Aggregate};
pub use parser::{parse_expression, MAX_NESTING, MAX_OPERATORS};
pub use recalc::{recalculate, recalculate_sheet};
