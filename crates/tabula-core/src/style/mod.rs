//! Cell styling types
//!
//! Styles are sparse: every field is optional and an all-`None` style is the
//! default. The engine never looks at styles while evaluating formulas; they
//! only affect display.

mod alignment;
mod number_format;

pub use alignment::HorizontalAlignment;
pub use number_format::NumberFormat;

/// Boolean style flags that can be toggled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
}

/// Sparse cell style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CellStyle {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bold: Option<bool>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub italic: Option<bool>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub underline: Option<bool>,
    /// Horizontal alignment
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub align: Option<HorizontalAlignment>,
    /// Number format used when the value is numeric
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub number_format: Option<NumberFormat>,
    /// Decimal places for the number format
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub decimals: Option<u8>,
    /// Text color (CSS-style string, e.g. `#FF0000`)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub color: Option<String>,
    /// Background color
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub background: Option<String>,
}

impl CellStyle {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field is set
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Set italic
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Set the number format
    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = Some(format);
        self
    }

    /// Set the decimal places
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Set horizontal alignment
    pub fn with_align(mut self, align: HorizontalAlignment) -> Self {
        self.align = Some(align);
        self
    }

    /// Overlay every field set in `partial` onto this style
    pub fn merge(&mut self, partial: &CellStyle) {
        if partial.bold.is_some() {
            self.bold = partial.bold;
        }
        if partial.italic.is_some() {
            self.italic = partial.italic;
        }
        if partial.underline.is_some() {
            self.underline = partial.underline;
        }
        if partial.align.is_some() {
            self.align = partial.align;
        }
        if partial.number_format.is_some() {
            self.number_format = partial.number_format;
        }
        if partial.decimals.is_some() {
            self.decimals = partial.decimals;
        }
        if partial.color.is_some() {
            self.color = partial.color.clone();
        }
        if partial.background.is_some() {
            self.background = partial.background.clone();
        }
    }

    /// Whether a boolean flag is on
    pub fn flag(&self, flag: StyleFlag) -> bool {
        self.flag_slot(flag).unwrap_or(false)
    }

    /// Turn a boolean flag on or off; off clears the field so styles stay sparse
    pub fn set_flag(&mut self, flag: StyleFlag, on: bool) {
        let value = if on { Some(true) } else { None };
        match flag {
            StyleFlag::Bold => self.bold = value,
            StyleFlag::Italic => self.italic = value,
            StyleFlag::Underline => self.underline = value,
        }
    }

    fn flag_slot(&self, flag: StyleFlag) -> Option<bool> {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
        }
    }

    /// Format a numeric value according to this style
    pub fn format_number(&self, value: f64) -> String {
        self.number_format.unwrap_or_default().format(
            value,
            self.decimals.unwrap_or(NumberFormat::DEFAULT_DECIMALS),
        )
    }
}
