//! Display values: computed values with number formats applied

use tabula_core::{CellAddress, ComputedCache, NumberFormat, Worksheet};

/// What a cell shows.
///
/// Formula cells show their computed value, falling back to the formula text
/// when no value has been computed yet. Numeric values go through the cell's
/// number format when it has a non-general one.
pub fn display_value(sheet: &Worksheet, computed: &ComputedCache, row: u32, col: u32) -> String {
    let addr = CellAddress::new(row, col);
    let Some(cell) = sheet.cell(addr) else {
        return String::new();
    };

    let Some(value) = computed.get(&addr) else {
        return cell.raw.clone();
    };

    match (cell.style.number_format, value.as_number()) {
        (Some(format), Some(n)) if format != NumberFormat::General => cell.style.format_number(n),
        _ => value.to_string(),
    }
}
