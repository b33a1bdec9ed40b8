//! Formula evaluator
//!
//! A formula is one of a handful of recognised forms, tried in order:
//!
//! 1. an aggregate over a reference or range: `=SUM(A1:B5)`, `=MAX(C2)`
//! 2. a conditional: `=IF(A1>3,"big","small")`
//! 3. a bare reference: `=A1`
//! 4. plain arithmetic over numbers and references: `=A1*2+B1^2`
//!
//! Referenced formula cells are evaluated recursively. The evaluator carries
//! the set of cells currently being evaluated; re-entering one of them yields
//! `#CIRCULAR!` instead of recursing. Every other failure yields `#ERROR!`.
//!
//! Nesting is bounded by [`MAX_DEPTH`]: each formula cell entered along a
//! reference chain and each operator applied takes one level. A formula whose
//! evaluation runs past the limit, and every formula waiting on it, yields
//! `#ERROR!`.

use crate::ast::{Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::{is_conditional, Accumulator, Aggregate};
use crate::parser::parse_expression;
use ahash::AHashSet;
use lazy_regex::regex_captures;
use log::trace;
use tabula_core::{
    coerce_number, looks_numeric, parse_ref, CellAddress, CellError, CellRange, CellValue,
    Worksheet,
};

/// Deepest nesting of formula cells and operators in one evaluation
pub const MAX_DEPTH: usize = 512;

/// Evaluate a formula against a sheet.
///
/// `current` is the address of the cell holding the formula, when there is one;
/// it enables circular-reference detection for that cell.
///
/// # Example
/// ```rust
/// use tabula_core::{CellValue, Worksheet};
/// use tabula_formula::evaluate;
///
/// let mut sheet = Worksheet::new("Sheet1");
/// sheet.set_raw_at(1, 1, "4");
///
/// assert_eq!(evaluate("=A1*2", &sheet, None), CellValue::Number(8.0));
/// assert_eq!(evaluate("plain", &sheet, None), CellValue::text("plain"));
/// ```
pub fn evaluate(formula: &str, sheet: &Worksheet, current: Option<CellAddress>) -> CellValue {
    Evaluator::new(sheet).evaluate(formula, current)
}

/// Evaluation pass over one sheet
pub struct Evaluator<'a> {
    sheet: &'a Worksheet,
    /// Cells whose evaluation is in progress
    visiting: AHashSet<CellAddress>,
    depth: usize,
    /// Set when `MAX_DEPTH` is hit, cleared once the outermost formula returns
    overflowed: bool,
}

impl<'a> Evaluator<'a> {
    /// Start a pass with an empty circularity guard
    pub fn new(sheet: &'a Worksheet) -> Self {
        Self {
            sheet,
            visiting: AHashSet::new(),
            depth: 0,
            overflowed: false,
        }
    }

    /// Evaluate one formula.
    ///
    /// Non-formula input is returned unchanged as text; an empty body after
    /// `=` yields empty text.
    pub fn evaluate(&mut self, formula: &str, current: Option<CellAddress>) -> CellValue {
        let body = match formula.strip_prefix('=') {
            Some(body) => body,
            None => return CellValue::text(formula),
        };

        if let Err(e) = self.descend() {
            trace!("{} not evaluated: {}", formula, e);
            return CellValue::error(CellError::Error);
        }

        if let Some(addr) = current {
            if !self.visiting.insert(addr) {
                self.depth -= 1;
                return CellValue::error(CellError::Circular);
            }
        }

        let mut result = self.evaluate_body(body);

        if let Some(addr) = current {
            self.visiting.remove(&addr);
        }
        self.depth -= 1;

        if self.overflowed {
            result = Err(too_deep());
            if self.depth == 0 {
                self.overflowed = false;
            }
        }

        result.unwrap_or_else(|e| {
            trace!("{} evaluated to #ERROR!: {}", formula, e);
            CellValue::error(CellError::Error)
        })
    }

    /// Computed value of a cell, keeping its type.
    ///
    /// Empty cells read as `0`, numeric-looking literals as numbers, other
    /// literals as text and formula cells as their computed value.
    pub fn resolve_value(&mut self, addr: CellAddress) -> CellValue {
        let sheet = self.sheet;
        let raw = match sheet.cell(addr) {
            Some(data) => data.raw.as_str(),
            None => return CellValue::Number(0.0),
        };

        if raw.is_empty() {
            CellValue::Number(0.0)
        } else if raw.starts_with('=') {
            self.evaluate(raw, Some(addr))
        } else if looks_numeric(raw) {
            CellValue::Number(coerce_number(raw))
        } else {
            CellValue::text(raw)
        }
    }

    /// Numeric value of a cell; anything non-numeric reads as `0`
    pub fn resolve_number(&mut self, addr: CellAddress) -> f64 {
        match self.resolve_value(addr) {
            CellValue::Number(n) => n,
            CellValue::Text(s) => coerce_number(&s),
        }
    }

    /// Aggregate over a range, reading empty cells as `0`.
    ///
    /// Only stored cells are visited; the rest of the rectangle is counted
    /// without being walked.
    pub fn aggregate_range(&mut self, function: Aggregate, range: &CellRange) -> f64 {
        let sheet = self.sheet;
        let mut acc = Accumulator::new();

        for (addr, _) in sheet.cells_in(range) {
            let value = self.resolve_number(addr);
            acc.push(value);
        }
        acc.push_zeros(range.cell_count() - acc.len());

        let n = acc.finish(function);
        trace!("{} over {} = {}", function.name(), range, n);
        n
    }

    fn descend(&mut self) -> FormulaResult<()> {
        if self.depth >= MAX_DEPTH {
            self.overflowed = true;
            return Err(too_deep());
        }
        self.depth += 1;
        Ok(())
    }

    fn evaluate_body(&mut self, body: &str) -> FormulaResult<CellValue> {
        let body = body.trim();
        if body.is_empty() {
            return Ok(CellValue::text(""));
        }

        if let Some((_, name, first, last)) = regex_captures!(
            r"^([A-Za-z]+)\s*\(\s*([A-Za-z]+[0-9]+)\s*(?::\s*([A-Za-z]+[0-9]+)\s*)?\)$",
            body
        ) {
            return self.evaluate_aggregate(name, first, last);
        }

        if let Some((_, name, args)) = regex_captures!(r"^([A-Za-z]+)\s*\((.*)\)$"s, body) {
            if is_conditional(name) {
                return self.evaluate_conditional(args);
            }
        }

        if let Some(addr) = parse_ref(body) {
            return Ok(self.resolve_value(addr));
        }

        let expr = parse_expression(body)?;
        let n = self.eval_expr(&expr)?;
        finite(n).map(CellValue::Number)
    }

    fn evaluate_aggregate(
        &mut self,
        name: &str,
        first: &str,
        last: &str,
    ) -> FormulaResult<CellValue> {
        let function =
            Aggregate::from_name(name).ok_or_else(|| FormulaError::UnknownFunction(name.into()))?;

        let start = reference(first)?;
        let end = if last.is_empty() {
            start
        } else {
            reference(last)?
        };

        let n = self.aggregate_range(function, &CellRange::new(start, end));
        finite(n).map(CellValue::Number)
    }

    fn evaluate_conditional(&mut self, args: &str) -> FormulaResult<CellValue> {
        let parts = split_arguments(args);
        let [condition, if_true, if_false] = parts.as_slice() else {
            return Err(FormulaError::Evaluation(format!(
                "IF takes 3 arguments, got {}",
                parts.len()
            )));
        };

        let (_, cell, op, literal) = regex_captures!(
            r"^([A-Za-z]+[0-9]+)\s*(>=|<=|>|<|=)\s*([-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?)$",
            condition.trim()
        )
        .ok_or_else(|| {
            FormulaError::Evaluation(format!("Unsupported IF condition '{}'", condition.trim()))
        })?;

        let left = self.resolve_number(reference(cell)?);
        let right = coerce_number(literal);
        let holds = match op {
            ">=" => left >= right,
            "<=" => left <= right,
            ">" => left > right,
            "<" => left < right,
            _ => left == right,
        };

        self.evaluate_branch(if holds { if_true } else { if_false })
    }

    fn evaluate_branch(&mut self, branch: &str) -> FormulaResult<CellValue> {
        let branch = branch.trim();

        if branch.len() >= 2 && branch.starts_with('"') && branch.ends_with('"') {
            return Ok(CellValue::text(&branch[1..branch.len() - 1]));
        }
        if let Some(addr) = parse_ref(branch) {
            return Ok(CellValue::Number(self.resolve_number(addr)));
        }
        if looks_numeric(branch) {
            return Ok(CellValue::Number(coerce_number(branch)));
        }

        Err(FormulaError::Evaluation(format!(
            "Unsupported IF branch '{}'",
            branch
        )))
    }

    fn eval_expr(&mut self, expr: &Expr) -> FormulaResult<f64> {
        match expr {
            Expr::Number(n) => Ok(*n),
            Expr::Ref(addr) => Ok(self.resolve_number(*addr)),
            Expr::Binary { .. } | Expr::Unary { .. } => {
                self.descend()?;
                let result = self.eval_operator(expr);
                self.depth -= 1;
                result
            }
        }
    }

    fn eval_operator(&mut self, expr: &Expr) -> FormulaResult<f64> {
        match expr {
            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(op.apply(left, right))
            }
            Expr::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                Ok(match op {
                    UnaryOperator::Plus => value,
                    UnaryOperator::Negate => -value,
                })
            }
            Expr::Number(_) | Expr::Ref(_) => self.eval_expr(expr),
        }
    }
}

fn reference(text: &str) -> FormulaResult<CellAddress> {
    parse_ref(text).ok_or_else(|| FormulaError::InvalidReference(text.into()))
}

fn too_deep() -> FormulaError {
    FormulaError::Evaluation(format!("nested deeper than {} levels", MAX_DEPTH))
}

fn finite(n: f64) -> FormulaResult<f64> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(FormulaError::Evaluation(format!("non-finite result {}", n)))
    }
}

/// Split function arguments at top-level commas, leaving quoted commas alone
fn split_arguments(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in args.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth = depth.saturating_sub(1),
            ',' if !in_quotes && depth == 0 => {
                parts.push(&args[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&args[start..]);
    parts
}
