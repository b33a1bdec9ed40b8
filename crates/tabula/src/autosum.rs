//! Auto-sum: propose `=SUM(...)` formulas from the selection

use tabula_core::{looks_numeric, make_ref, CellAddress, Selection, Worksheet};

/// Formulas auto-sum would write for `selection`, as `(address, formula)` pairs.
///
/// A single cell gets the sum of the contiguous run of numeric-looking cells
/// directly above it (nothing when there is no such run). A larger selection
/// gets one formula per column in the row below its bottom edge, skipping
/// columns where that row falls outside the sheet.
pub fn auto_sum(sheet: &Worksheet, selection: &Selection) -> Vec<(CellAddress, String)> {
    if selection.is_single_cell() {
        let target = selection.anchor();
        return numeric_run_above(sheet, target)
            .map(|top| {
                let formula = format!(
                    "=SUM({}:{})",
                    make_ref(top, target.col),
                    make_ref(target.row - 1, target.col)
                );
                vec![(target, formula)]
            })
            .unwrap_or_default();
    }

    let range = selection.normalize();
    let below = range.r_max() + 1;
    if below > sheet.rows() {
        return Vec::new();
    }

    (range.c_min()..=range.c_max().min(sheet.cols()))
        .map(|col| {
            let formula = format!(
                "=SUM({}:{})",
                make_ref(range.r_min(), col),
                make_ref(range.r_max(), col)
            );
            (CellAddress::new(below, col), formula)
        })
        .collect()
}

/// Top row of the numeric run ending right above `target`
fn numeric_run_above(sheet: &Worksheet, target: CellAddress) -> Option<u32> {
    let mut top = None;
    let mut row = target.row;
    while row > 1 && looks_numeric(sheet.raw_at(row - 1, target.col)) {
        row -= 1;
        top = Some(row);
    }
    top
}
