//! Copy/cut/paste through the engine

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tabula::prelude::*;

fn raw(engine: &SheetEngine, row: u32, col: u32) -> Option<String> {
    engine.get_cell(row, col).map(|c| c.raw.clone())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A copied cell lands at its offset from the source's top-left
    #[test]
    fn paste_preserves_offsets(
        src_row in 1u32..=10,
        src_col in 1u32..=10,
        target_row in 1u32..=100,
        target_col in 1u32..=26,
    ) {
        let mut engine = SheetEngine::new();
        engine.set_cell_raw(src_row, src_col, "moved");
        engine.set_selection(Selection::span(10, 10, 1, 1));
        engine.copy(false);

        engine.set_selection(Selection::new(target_row, target_col));
        engine.paste(PasteMode::All);

        let row = target_row + src_row - 1;
        let col = target_col + src_col - 1;
        if row <= 100 && col <= 26 {
            prop_assert_eq!(raw(&engine, row, col), Some("moved".to_string()));
        }
        prop_assert_eq!(engine.active_sheet().rows(), 100);
        prop_assert_eq!(engine.active_sheet().cols(), 26);
    }
}

#[test]
fn test_copy_keeps_source_and_clipboard() {
    let mut engine = SheetEngine::new();
    engine.set_cell_raw(1, 1, "=B1*2");
    engine.set_cell_raw(1, 2, "4");
    engine.set_selection(Selection::span(1, 1, 1, 2));
    engine.copy(false);

    engine.set_selection(Selection::new(3, 1));
    engine.paste(PasteMode::All);
    engine.set_selection(Selection::new(5, 1));
    engine.paste(PasteMode::All);

    // Formulas are pasted verbatim, not re-pointed
    assert_eq!(raw(&engine, 3, 1).as_deref(), Some("=B1*2"));
    assert_eq!(engine.get_cell_display_value(5, 1), "8");
    assert_eq!(raw(&engine, 1, 1).as_deref(), Some("=B1*2"));
    assert!(engine.clipboard().is_some());
}

#[test]
fn test_cut_is_single_use() {
    let mut engine = SheetEngine::new();
    engine.set_cell_raw(2, 2, "x");
    engine.set_selection(Selection::new(2, 2));
    engine.copy(true);
    assert!(engine.get_cell(2, 2).is_none());

    engine.set_selection(Selection::new(4, 4));
    engine.paste(PasteMode::All);
    assert_eq!(raw(&engine, 4, 4).as_deref(), Some("x"));
    assert!(engine.clipboard().is_none());

    engine.set_selection(Selection::new(6, 6));
    engine.paste(PasteMode::All);
    assert!(engine.get_cell(6, 6).is_none());
}

#[test]
fn test_paste_values_and_formats() {
    let mut engine = SheetEngine::new();
    engine.set_cell_raw(1, 1, "0.25");
    engine.apply_style(CellStyle::new().with_number_format(NumberFormat::Percent));
    engine.set_cell_raw(2, 1, "0.5");

    engine.set_selection(Selection::new(1, 1));
    engine.copy(false);

    // Formats only: A2 keeps its content and takes the percent format
    engine.set_selection(Selection::new(2, 1));
    engine.paste(PasteMode::Formats);
    assert_eq!(engine.get_cell_display_value(2, 1), "50.00%");

    // Values only: C1 takes the content and keeps its default style
    engine.set_selection(Selection::new(1, 3));
    engine.paste(PasteMode::Values);
    assert_eq!(engine.get_cell_display_value(1, 3), "0.25");
    assert_eq!(engine.undo_description().as_deref(), Some("Paste values"));
}

#[test]
fn test_paste_across_sheets() {
    let mut engine = SheetEngine::new();
    engine.set_cell_raw(1, 1, "shared");
    engine.copy(false);

    engine.add_sheet(None);
    engine.paste(PasteMode::All);
    assert_eq!(engine.workbook().active_index(), 1);
    assert_eq!(raw(&engine, 1, 1).as_deref(), Some("shared"));
}
