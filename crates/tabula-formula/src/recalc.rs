//! Full recompute of computed values

use crate::evaluator::Evaluator;
use log::debug;
use tabula_core::{CellValue, ComputedCache, Workbook, Worksheet};

/// Recompute every cell of the workbook's active sheet
pub fn recalculate(workbook: &Workbook) -> ComputedCache {
    recalculate_sheet(workbook.active_sheet())
}

/// Recompute every stored cell of a sheet.
///
/// Formula cells map to their evaluated value, every other cell to its raw
/// text. One evaluator (and so one circularity guard) serves the whole pass.
pub fn recalculate_sheet(sheet: &Worksheet) -> ComputedCache {
    let mut evaluator = Evaluator::new(sheet);
    let mut cache = ComputedCache::with_capacity(sheet.cell_count());
    let mut formulas = 0usize;

    for (addr, data) in sheet.iter_cells() {
        let value = if data.is_formula() {
            formulas += 1;
            evaluator.evaluate(&data.raw, Some(addr))
        } else {
            CellValue::text(data.raw.as_str())
        };
        cache.insert(addr, value);
    }

    debug!(
        "recalculated '{}': {} cells, {} formulas",
        sheet.name(),
        cache.len(),
        formulas
    );
    cache
}
