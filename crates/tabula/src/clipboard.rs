//! Copy/cut/paste of cell ranges

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tabula_core::{CellAddress, CellData, CellRange, Worksheet};

/// What a paste overwrites at the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasteMode {
    /// Raw content and style
    #[default]
    All,
    /// Raw content only; the destination keeps its style
    Values,
    /// Style only; the destination keeps its raw content
    Formats,
}

impl FromStr for PasteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(PasteMode::All),
            "values" => Ok(PasteMode::Values),
            "formats" => Ok(PasteMode::Formats),
            other => Err(format!("unknown paste mode '{}'", other)),
        }
    }
}

impl fmt::Display for PasteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PasteMode::All => "all",
            PasteMode::Values => "values",
            PasteMode::Formats => "formats",
        };
        f.write_str(name)
    }
}

/// A captured range of cells
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardData {
    /// Deep copies of the occupied cells, at their source addresses
    pub cells: BTreeMap<CellAddress, CellData>,
    /// The normalized source rectangle
    pub range: CellRange,
    /// Whether the source was cut (single-use)
    pub is_cut: bool,
    /// Index of the sheet the cells came from
    pub source_sheet: usize,
}

impl ClipboardData {
    /// Capture every occupied cell of `range`
    pub fn capture(sheet: &Worksheet, range: CellRange, is_cut: bool, source_sheet: usize) -> Self {
        let cells = sheet
            .cells_in(&range)
            .map(|(addr, data)| (addr, data.clone()))
            .collect();
        Self {
            cells,
            range,
            is_cut,
            source_sheet,
        }
    }

    /// Compute the writes of pasting with the source's top-left at `target`.
    ///
    /// Each cell moves by `target - range.start`. Cells landing outside
    /// `dest` are dropped.
    pub fn paste_into(
        &self,
        dest: &Worksheet,
        target: CellAddress,
        mode: PasteMode,
    ) -> Vec<(CellAddress, Option<CellData>)> {
        let dr = target.row as i64 - self.range.start.row as i64;
        let dc = target.col as i64 - self.range.start.col as i64;

        self.cells
            .iter()
            .filter_map(|(addr, data)| {
                let to = addr.offset(dr, dc).filter(|to| dest.in_bounds(to))?;
                let existing = dest.cell(to);
                let pasted = match mode {
                    PasteMode::All => data.clone(),
                    PasteMode::Values => CellData::with_style(
                        data.raw.clone(),
                        existing.map(|c| c.style.clone()).unwrap_or_default(),
                    ),
                    PasteMode::Formats => CellData::with_style(
                        existing.map(|c| c.raw.clone()).unwrap_or_default(),
                        data.style.clone(),
                    ),
                };
                Some((to, Some(pasted)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabula_core::CellStyle;

    fn source() -> Worksheet {
        let mut sheet = Worksheet::with_size("Sheet1", 10, 5);
        sheet.set_raw("A1", "1").unwrap();
        sheet.set_cell(
            CellAddress::new(2, 2),
            CellData::with_style("=A1*2", CellStyle::new().with_bold(true)),
        );
        sheet.set_raw("E10", "outside").unwrap();
        sheet
    }

    #[test]
    fn test_capture_only_occupied_cells() {
        let clip = ClipboardData::capture(&source(), CellRange::from_indices(1, 1, 3, 3), false, 0);
        assert_eq!(clip.cells.len(), 2);
        assert_eq!(clip.range.to_a1_string(), "A1:C3");
    }

    #[test]
    fn test_paste_offsets_and_drops_out_of_bounds() {
        let sheet = source();
        let clip = ClipboardData::capture(&sheet, CellRange::from_indices(1, 1, 2, 2), false, 0);

        let writes = clip.paste_into(&sheet, CellAddress::new(9, 4), PasteMode::All);
        // A1 -> D9 fits, B2 -> E10 fits
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1].0, CellAddress::new(10, 5));
        assert_eq!(writes[1].1.as_ref().map(|c| c.raw.as_str()), Some("=A1*2"));

        let writes = clip.paste_into(&sheet, CellAddress::new(10, 5), PasteMode::All);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, CellAddress::new(10, 5));
    }

    #[test]
    fn test_paste_values_and_formats() {
        let sheet = source();
        let clip = ClipboardData::capture(&sheet, CellRange::from_indices(2, 2, 2, 2), false, 0);

        let mut dest = Worksheet::new("Sheet2");
        dest.set_cell(
            CellAddress::new(1, 1),
            CellData::with_style("keep", CellStyle::new().with_italic(true)),
        );
        let target = CellAddress::new(1, 1);

        let values = clip.paste_into(&dest, target, PasteMode::Values);
        assert_eq!(
            values[0].1,
            Some(CellData::with_style("=A1*2", CellStyle::new().with_italic(true)))
        );

        let formats = clip.paste_into(&dest, target, PasteMode::Formats);
        assert_eq!(
            formats[0].1,
            Some(CellData::with_style("keep", CellStyle::new().with_bold(true)))
        );
    }

    #[test]
    fn test_paste_mode_from_str() {
        assert_eq!("Values".parse::<PasteMode>(), Ok(PasteMode::Values));
        assert_eq!(PasteMode::Formats.to_string(), "formats");
        assert!("everything".parse::<PasteMode>().is_err());
    }
}
