//! CSV reader

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use tabula_core::{CellAddress, CellData, Error, MAX_COLS, MAX_ROWS};

/// Raw cell text read from a CSV source.
///
/// Empty fields are skipped; `rows`/`cols` give the extent of the records,
/// including trailing empty fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvGrid {
    /// Non-empty fields keyed by their 1-based position
    pub cells: BTreeMap<CellAddress, CellData>,
    /// Number of records read
    pub rows: u32,
    /// Length of the longest record
    pub cols: u32,
}

impl CsvGrid {
    /// Whether no records were read at all
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<CsvGrid> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV text
    pub fn read_str(text: &str, options: &CsvReadOptions) -> CsvResult<CsvGrid> {
        Self::read(text.as_bytes(), options)
    }

    /// Read CSV from a reader. Every record is data; there is no header row.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<CsvGrid> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut grid = CsvGrid::default();
        let mut record = csv::StringRecord::new();
        let mut next_line = 1u64;

        while csv_reader.read_record(&mut record)? {
            // Blank lines are skipped by the parser but still occupy a row
            if let Some(position) = record.position() {
                let skipped = position.line().saturating_sub(next_line);
                grid.rows = grid
                    .rows
                    .saturating_add(u32::try_from(skipped).unwrap_or(u32::MAX));
                let embedded: u64 = record.iter().map(|f| f.matches('\n').count() as u64).sum();
                next_line = position.line() + 1 + embedded;
            }

            let row = grid.rows.saturating_add(1);
            if row > MAX_ROWS {
                return Err(Error::RowOutOfBounds(row, MAX_ROWS).into());
            }
            let width = record.len() as u32;
            if width > MAX_COLS {
                return Err(Error::ColumnOutOfBounds(width, MAX_COLS).into());
            }

            for (idx, field) in record.iter().enumerate() {
                let field = if options.trim { field.trim() } else { field };
                if field.is_empty() {
                    continue;
                }
                let addr = CellAddress::new(row, idx as u32 + 1);
                grid.cells.insert(addr, CellData::new(field));
            }

            grid.rows = row;
            grid.cols = grid.cols.max(width);
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(grid: &CsvGrid, row: u32, col: u32) -> Option<&str> {
        grid.cells
            .get(&CellAddress::new(row, col))
            .map(|c| c.raw.as_str())
    }

    #[test]
    fn test_read_basic() {
        let grid = CsvReader::read_str("a,b\n1,2\n", &CsvReadOptions::default()).unwrap();
        assert_eq!((grid.rows, grid.cols), (2, 2));
        assert_eq!(raw(&grid, 1, 1), Some("a"));
        assert_eq!(raw(&grid, 2, 2), Some("2"));
    }

    #[test]
    fn test_ragged_rows_and_empty_fields() {
        let grid = CsvReader::read_str("x,,z\n\"q,1\"\n,,,w", &CsvReadOptions::default()).unwrap();
        assert_eq!((grid.rows, grid.cols), (3, 4));
        assert_eq!(grid.cells.len(), 4);
        assert_eq!(raw(&grid, 1, 2), None);
        assert_eq!(raw(&grid, 2, 1), Some("q,1"));
        assert_eq!(raw(&grid, 3, 4), Some("w"));
    }

    #[test]
    fn test_whitespace_kept_unless_trimmed() {
        let text = " a , b ";
        let grid = CsvReader::read_str(text, &CsvReadOptions::default()).unwrap();
        assert_eq!(raw(&grid, 1, 1), Some(" a "));

        let options = CsvReadOptions {
            trim: true,
            ..Default::default()
        };
        let grid = CsvReader::read_str(text, &options).unwrap();
        assert_eq!(raw(&grid, 1, 2), Some("b"));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let options = CsvReadOptions {
            delimiter: b';',
            ..Default::default()
        };
        let grid = CsvReader::read_str("1;2,5", &options).unwrap();
        assert_eq!(raw(&grid, 1, 2), Some("2,5"));
    }

    #[test]
    fn test_blank_lines_keep_their_rows() {
        let grid = CsvReader::read_str("x\n\ny\n", &CsvReadOptions::default()).unwrap();
        assert_eq!(grid.rows, 3);
        assert_eq!(raw(&grid, 1, 1), Some("x"));
        assert_eq!(raw(&grid, 2, 1), None);
        assert_eq!(raw(&grid, 3, 1), Some("y"));

        let grid = CsvReader::read_str("\"a\nb\"\r\n\r\nc", &CsvReadOptions::default()).unwrap();
        assert_eq!(grid.rows, 3);
        assert_eq!(raw(&grid, 1, 1), Some("a\nb"));
        assert_eq!(raw(&grid, 3, 1), Some("c"));
    }

    #[test]
    fn test_empty_input() {
        let grid = CsvReader::read_str("", &CsvReadOptions::default()).unwrap();
        assert!(grid.is_empty());
    }
}
