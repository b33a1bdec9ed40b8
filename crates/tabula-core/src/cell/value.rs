//! Computed cell values

use crate::cell::CellAddress;
use ahash::AHashMap;
use std::fmt;

/// Computed values of a sheet, keyed by address.
///
/// Derived state: rebuilt after every mutation and never persisted.
pub type ComputedCache = AHashMap<CellAddress, CellValue>;

/// A computed scalar: the result of evaluating a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Numeric result
    Number(f64),
    /// Text result, including literal text and error sentinels
    Text(String),
}

impl CellValue {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Create an error sentinel value
    pub fn error(error: CellError) -> Self {
        CellValue::Text(error.as_str().to_string())
    }

    /// Numeric view of this value, if it has one.
    ///
    /// Text counts as numeric only when it parses as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_number(s),
        }
    }

    /// Best-effort numeric coercion: anything non-numeric reads as zero
    pub fn to_number(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// Whether this value is one of the error sentinels
    pub fn is_error(&self) -> bool {
        self.as_error().is_some()
    }

    /// Get the error sentinel carried by this value, if any
    pub fn as_error(&self) -> Option<CellError> {
        match self {
            CellValue::Text(s) => CellError::from_str(s),
            CellValue::Number(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::error(e)
    }
}

/// Error sentinels embedded in computed output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #ERROR! - the expression could not be evaluated
    Error,
    /// #CIRCULAR! - the cell depends on itself
    Circular,
}

impl CellError {
    /// Get the sentinel string
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Error => "#ERROR!",
            CellError::Circular => "#CIRCULAR!",
        }
    }

    /// Parse a sentinel string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "#ERROR!" => Some(CellError::Error),
            "#CIRCULAR!" => Some(CellError::Circular),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse trimmed text as a finite decimal number.
///
/// Rust's float parser also accepts `inf` and `NaN` spellings; those are text
/// in a sheet, not numbers.
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() || s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Whether raw text reads as a number
pub fn looks_numeric(s: &str) -> bool {
    parse_number(s).is_some()
}

/// Coerce raw text to a number, reading anything unparseable as zero
pub fn coerce_number(s: &str) -> f64 {
    parse_number(s).unwrap_or(0.0)
}

/// Render a number in its shortest round-trip form (`6`, `2.5`, `0.1`).
///
/// Magnitudes of `1e21` and above, or below `1e-6`, switch to exponent
/// notation with an explicit sign (`1e+21`, `1.5e-7`).
pub(crate) fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Covers -0.0 as well
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }

    format!("{}", n)
}
