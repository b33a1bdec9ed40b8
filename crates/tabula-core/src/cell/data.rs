//! Authored cell content

use crate::style::CellStyle;

/// Complete authored data for a single cell
///
/// `raw` is what the user typed: a literal, or a formula starting with `=`.
/// It is the authoritative source; computed values are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellData {
    /// Raw text as entered
    #[cfg_attr(feature = "serde", serde(default))]
    pub raw: String,
    /// Sparse formatting flags
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "CellStyle::is_default")
    )]
    pub style: CellStyle,
}

impl CellData {
    /// Create a new cell with raw content and default style
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Self {
            raw: raw.into(),
            style: CellStyle::default(),
        }
    }

    /// Create a new cell with raw content and a style
    pub fn with_style<S: Into<String>>(raw: S, style: CellStyle) -> Self {
        Self {
            raw: raw.into(),
            style,
        }
    }

    /// Check if this cell carries nothing worth storing (no raw text and default style)
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.style.is_default()
    }

    /// Whether the raw content is a formula
    pub fn is_formula(&self) -> bool {
        self.raw.starts_with('=')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell() {
        assert!(CellData::default().is_empty());
        assert!(!CellData::new("x").is_empty());

        let styled = CellData::with_style("", CellStyle::default().with_bold(true));
        assert!(!styled.is_empty());
    }

    #[test]
    fn test_is_formula() {
        assert!(CellData::new("=A1").is_formula());
        assert!(!CellData::new("A1").is_formula());
        assert!(!CellData::new(" =A1").is_formula());
    }
}
