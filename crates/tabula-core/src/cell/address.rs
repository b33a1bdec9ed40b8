//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "AB12")
///
/// Rows and columns are both 1-based, matching the A1 notation they print as.
/// Addresses order row-major, so a `BTreeMap` keyed by them iterates the way a
/// sheet reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based, A=1, B=2, ..., Z=26, AA=27)
    pub col: u32,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// Column letters are case-insensitive.
    ///
    /// # Examples
    /// ```
    /// use tabula_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!((addr.row, addr.col), (1, 1));
    ///
    /// let addr = CellAddress::parse("ab12").unwrap();
    /// assert_eq!((addr.row, addr.col), (12, 28));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());

        if split == 0 {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[..split])?;

        let row_str = &s[split..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        Ok(Self { row, col })
    }

    /// Convert a 1-based column number to letters (1 = A, 26 = Z, 27 = AA, etc.)
    ///
    /// Bijective base-26: there is no zero digit.
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to a 1-based column number (A = 1, Z = 26, AA = 27, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
                .filter(|v| *v <= MAX_COLS)
                .ok_or_else(|| Error::ColumnOutOfBounds(u32::MAX, MAX_COLS))?;
        }

        Ok(col)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row)
    }

    /// Shift this address by a signed row/column delta.
    ///
    /// Returns `None` when the result would fall before row/column 1 or past
    /// the addressable limits.
    pub fn offset(&self, rows: i64, cols: i64) -> Option<CellAddress> {
        let row = self.row as i64 + rows;
        let col = self.col as i64 + cols;
        if row < 1 || col < 1 || row > MAX_ROWS as i64 || col > MAX_COLS as i64 {
            return None;
        }
        Some(CellAddress::new(row as u32, col as u32))
    }

    /// Create a range from this address to another
    pub fn to(&self, other: CellAddress) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_a1_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CellAddress {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        CellAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Build the canonical A1 reference for a 1-based `(row, col)` pair.
///
/// ```
/// assert_eq!(tabula_core::make_ref(3, 28), "AB3");
/// ```
pub fn make_ref(row: u32, col: u32) -> String {
    CellAddress::new(row, col).to_a1_string()
}

/// Parse an A1 reference, returning `None` for malformed input.
///
/// Callers treat `None` as a reference that resolves to empty/zero.
pub fn parse_ref(s: &str) -> Option<CellAddress> {
    CellAddress::parse(s).ok()
}

/// A normalized range of cells (e.g., "A1:B10")
///
/// `start` is always the top-left corner and `end` the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range, normalizing each axis independently
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a range from row/column numbers
    pub fn from_indices(r1: u32, c1: u32, r2: u32, c2: u32) -> Self {
        Self::new(CellAddress::new(r1, c1), CellAddress::new(r2, c2))
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from A1:B10 notation (a lone address is a single-cell range)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some((first, second)) = s.split_once(':') {
            let start = CellAddress::parse(first)
                .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
            let end = CellAddress::parse(second)
                .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
            Ok(Self::new(start, end))
        } else {
            Ok(Self::single(CellAddress::parse(s)?))
        }
    }

    /// Smallest row in the range
    pub fn r_min(&self) -> u32 {
        self.start.row
    }

    /// Largest row in the range
    pub fn r_max(&self) -> u32 {
        self.end.row
    }

    /// Smallest column in the range
    pub fn c_min(&self) -> u32 {
        self.start.col
    }

    /// Largest column in the range
    pub fn c_max(&self) -> u32 {
        self.end.col
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Whether the range covers exactly one cell
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Iterate over all cell addresses in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
            remaining: self.cell_count() as usize,
        }
    }

    /// Format as A1:B10 string; a single cell omits the colon
    pub fn to_a1_string(&self) -> String {
        if self.is_single() {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    current_col: u32,
    remaining: usize,
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.range.end.row {
            return None;
        }

        let addr = CellAddress::new(self.current_row, self.current_col);

        // Move to next cell
        self.current_col += 1;
        if self.current_col > self.range.end.col {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        }
        self.remaining -= 1;

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CellRangeIterator {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(1), "A");
        assert_eq!(CellAddress::column_to_letters(2), "B");
        assert_eq!(CellAddress::column_to_letters(26), "Z");
        assert_eq!(CellAddress::column_to_letters(27), "AA");
        assert_eq!(CellAddress::column_to_letters(28), "AB");
        assert_eq!(CellAddress::column_to_letters(702), "ZZ");
        assert_eq!(CellAddress::column_to_letters(703), "AAA");
        assert_eq!(CellAddress::column_to_letters(16384), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 1);
        assert_eq!(CellAddress::letters_to_column("Z").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("AA").unwrap(), 27);
        assert_eq!(CellAddress::letters_to_column("ZZ").unwrap(), 702);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16384);

        // Case insensitive
        assert_eq!(CellAddress::letters_to_column("a").unwrap(), 1);
        assert_eq!(CellAddress::letters_to_column("aa").unwrap(), 27);

        assert!(CellAddress::letters_to_column("XFE").is_err());
        assert!(CellAddress::letters_to_column("AAAAAAAAAA").is_err());
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("A1").unwrap();
        assert_eq!(addr, CellAddress::new(1, 1));

        let addr = CellAddress::parse("C10").unwrap();
        assert_eq!(addr, CellAddress::new(10, 3));

        let addr = CellAddress::parse(" b2 ").unwrap();
        assert_eq!(addr, CellAddress::new(2, 2));
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A1B").is_err());
        assert!(CellAddress::parse("A-1").is_err());
        assert!(CellAddress::parse("$A$1").is_err());
        assert!(CellAddress::parse("A1048577").is_err());
    }

    #[test]
    fn test_parse_ref_returns_none_on_garbage() {
        assert_eq!(parse_ref("B7"), Some(CellAddress::new(7, 2)));
        assert_eq!(parse_ref("hello"), None);
        assert_eq!(parse_ref("7B"), None);
    }

    #[test]
    fn test_make_ref() {
        assert_eq!(make_ref(1, 1), "A1");
        assert_eq!(make_ref(100, 3), "C100");
        assert_eq!(make_ref(5, 27), "AA5");
    }

    #[test]
    fn test_offset() {
        let addr = CellAddress::new(2, 2);
        assert_eq!(addr.offset(3, -1), Some(CellAddress::new(5, 1)));
        assert_eq!(addr.offset(-2, 0), None);
        assert_eq!(addr.offset(0, -2), None);
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut addrs = vec![
            CellAddress::new(2, 1),
            CellAddress::new(1, 3),
            CellAddress::new(1, 1),
        ];
        addrs.sort();
        assert_eq!(
            addrs,
            vec![
                CellAddress::new(1, 1),
                CellAddress::new(1, 3),
                CellAddress::new(2, 1)
            ]
        );
    }

    #[test]
    fn test_cell_range_normalizes() {
        let range = CellRange::parse("C3:A1").unwrap();
        assert_eq!(range.start, CellAddress::new(1, 1));
        assert_eq!(range.end, CellAddress::new(3, 3));

        let range = CellRange::from_indices(1, 4, 5, 2);
        assert_eq!((range.r_min(), range.r_max()), (1, 5));
        assert_eq!((range.c_min(), range.c_max()), (2, 4));
    }

    #[test]
    fn test_cell_range_display() {
        assert_eq!(CellRange::parse("A1:C3").unwrap().to_string(), "A1:C3");
        assert_eq!(CellRange::parse("B2").unwrap().to_string(), "B2");
        assert_eq!(CellRange::parse("B2:B2").unwrap().to_string(), "B2");
    }

    #[test]
    fn test_cell_range_contains() {
        let range = CellRange::parse("B2:D4").unwrap();

        assert!(range.contains(&CellAddress::new(2, 2)));
        assert!(range.contains(&CellAddress::new(4, 4)));
        assert!(range.contains(&CellAddress::new(3, 3)));

        assert!(!range.contains(&CellAddress::new(1, 1)));
        assert!(!range.contains(&CellAddress::new(5, 2)));
    }

    #[test]
    fn test_cell_range_iterator() {
        let range = CellRange::parse("A1:B2").unwrap();
        let cells: Vec<_> = range.cells().collect();

        assert_eq!(range.cells().len(), 4);
        assert_eq!(
            cells,
            vec![
                CellAddress::new(1, 1),
                CellAddress::new(1, 2),
                CellAddress::new(2, 1),
                CellAddress::new(2, 2),
            ]
        );
    }
}
