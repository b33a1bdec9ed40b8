//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvWriteOptions;
use tabula_core::{CellAddress, ComputedCache, Worksheet};

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a worksheet's computed values to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        worksheet: &Worksheet,
        computed: &ComputedCache,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(worksheet, computed, file, options)
    }

    /// Write a worksheet's computed values to a string
    pub fn write_string(
        worksheet: &Worksheet,
        computed: &ComputedCache,
        options: &CsvWriteOptions,
    ) -> CsvResult<String> {
        let mut buffer = Vec::new();
        Self::write(worksheet, computed, &mut buffer, options)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write the used range of a worksheet to a writer.
    ///
    /// Each cell is written as its computed value from `computed`, falling
    /// back to the raw text for cells missing from the cache. Cells inside the
    /// rectangle with nothing stored are written as empty fields.
    pub fn write<W: Write>(
        worksheet: &Worksheet,
        computed: &ComputedCache,
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(options.line_terminator.to_csv())
            .flexible(false)
            .from_writer(writer);

        if let Some(range) = worksheet.used_range() {
            for row in range.r_min()..=range.r_max() {
                let mut record = Vec::with_capacity(range.col_count() as usize);

                for col in range.c_min()..=range.c_max() {
                    let addr = CellAddress::new(row, col);
                    let value = match computed.get(&addr) {
                        Some(value) => value.to_string(),
                        None => worksheet.raw_at(row, col).to_string(),
                    };
                    record.push(value);
                }

                if record.len() == 1 && record[0].is_empty() {
                    // A lone empty field would otherwise be quoted as `""`
                    csv_writer.flush()?;
                    csv_writer
                        .get_mut()
                        .write_all(options.line_terminator.as_bytes())?;
                } else {
                    csv_writer.write_record(&record)?;
                }
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}
