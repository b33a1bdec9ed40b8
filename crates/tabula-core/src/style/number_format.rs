//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NumberFormat {
    /// General format (default): the computed value as-is
    #[default]
    General,
    /// Fixed decimals with thousands separators: `1,234.50`
    Number,
    /// Dollar-prefixed fixed decimals: `$1,234.50`
    Currency,
    /// Value times 100 with a percent sign: `12.50%`
    Percent,
}

impl NumberFormat {
    /// Decimals used when a style does not specify any
    pub const DEFAULT_DECIMALS: u8 = 2;

    /// Format a number for display
    pub fn format(&self, value: f64, decimals: u8) -> String {
        match self {
            NumberFormat::General => crate::cell::CellValue::Number(value).to_string(),
            NumberFormat::Number => group_thousands(value, decimals),
            NumberFormat::Currency => {
                let body = group_thousands(value.abs(), decimals);
                if value < 0.0 && body.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
                    format!("-${}", body)
                } else {
                    format!("${}", body)
                }
            }
            NumberFormat::Percent => format!("{:.*}%", decimals as usize, value * 100.0),
        }
    }
}

/// Fixed-point rendering with `,` between groups of three integer digits
fn group_thousands(value: f64, decimals: u8) -> String {
    let fixed = format!("{:.*}", decimals as usize, value);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
