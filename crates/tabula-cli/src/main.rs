//! Tabula CLI - workbook conversion and formula evaluation

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tabula::prelude::*;
use tabula::display::display_value;
use tabula::json::to_json;
use tabula::{evaluate, recalculate_sheet, CsvWriteOptions, LineTerminator};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(author, version, about = "Spreadsheet conversion and formula evaluation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the computed value of every cell in a sheet
    Eval {
        /// Input workbook (json, csv)
        input: PathBuf,

        /// Sheet index to evaluate (0-based, default: active sheet)
        #[arg(short, long)]
        sheet: Option<usize>,

        /// Evaluate this formula against the sheet instead, e.g. "=SUM(A1:A3)*2"
        #[arg(short, long)]
        formula: Option<String>,
    },

    /// Export the computed values of a sheet as CSV to stdout or a file
    #[command(alias = "csv")]
    ToCsv {
        /// Input workbook (json, csv)
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sheet index to convert (0-based, default: active sheet)
        #[arg(short, long)]
        sheet: Option<usize>,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// End lines with CRLF instead of LF
        #[arg(long)]
        crlf: bool,
    },

    /// Convert a CSV file to a JSON workbook
    FromCsv {
        /// Input CSV file
        input: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show information about a workbook
    Info {
        /// Input workbook
        input: PathBuf,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input workbook
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            input,
            sheet,
            formula,
        } => eval(&input, sheet, formula.as_deref()),
        Commands::ToCsv {
            input,
            output,
            sheet,
            delimiter,
            crlf,
        } => to_csv(&input, output.as_deref(), sheet, delimiter, crlf),
        Commands::FromCsv { input, output } => from_csv(&input, output.as_deref()),
        Commands::Info { input } => show_info(&input),
        Commands::Sheets { input } => list_sheets(&input),
    }
}

fn open(input: &Path) -> Result<Workbook> {
    Workbook::open(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

fn pick_sheet(workbook: &Workbook, index: Option<usize>) -> Result<&Worksheet> {
    let index = index.unwrap_or_else(|| workbook.active_index());
    workbook
        .worksheet(index)
        .with_context(|| format!("Sheet index {} not found", index))
}

fn eval(input: &Path, sheet_idx: Option<usize>, formula: Option<&str>) -> Result<()> {
    let workbook = open(input)?;
    let sheet = pick_sheet(&workbook, sheet_idx)?;

    if let Some(formula) = formula {
        println!("{}", evaluate(formula, sheet, None));
        return Ok(());
    }

    let computed = recalculate_sheet(sheet);
    for (addr, _) in sheet.iter_cells() {
        println!(
            "{}\t{}",
            addr,
            display_value(sheet, &computed, addr.row, addr.col)
        );
    }

    Ok(())
}

fn to_csv(
    input: &Path,
    output: Option<&Path>,
    sheet_idx: Option<usize>,
    delimiter: char,
    crlf: bool,
) -> Result<()> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{}'", delimiter);
    }

    let workbook = open(input)?;
    let sheet = pick_sheet(&workbook, sheet_idx)?;

    if sheet.used_range().is_none() {
        eprintln!("Warning: Sheet appears to be empty");
        return Ok(());
    }

    let computed = recalculate_sheet(sheet);
    let options = CsvWriteOptions {
        delimiter: delimiter as u8,
        line_terminator: if crlf {
            LineTerminator::CRLF
        } else {
            LineTerminator::LF
        },
        ..Default::default()
    };

    match output {
        Some(output_path) => {
            CsvWriter::write_file(sheet, &computed, output_path, &options)
                .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
            eprintln!("Wrote sheet '{}' to '{}'", sheet.name(), output_path.display());
        }
        None => {
            let csv = CsvWriter::write_string(sheet, &computed, &options)
                .context("Failed to render CSV")?;
            io::stdout()
                .write_all(csv.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn from_csv(input: &Path, output: Option<&Path>) -> Result<()> {
    let workbook = open(input)?;

    match output {
        Some(output_path) => {
            workbook
                .save(output_path)
                .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
            eprintln!(
                "Wrote {} cells to '{}'",
                workbook.active_sheet().cell_count(),
                output_path.display()
            );
        }
        None => {
            let json = to_json(&workbook).context("Failed to render JSON")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn show_info(input: &Path) -> Result<()> {
    let workbook = open(input)?;

    println!("File: {}", input.display());
    println!("Sheets: {}", workbook.sheet_count());

    for (i, sheet) in workbook.worksheets().enumerate() {
        let formula_count = sheet.formula_cells().count();
        let marker = if i == workbook.active_index() { " (active)" } else { "" };

        println!();
        println!("  Sheet {}: \"{}\"{}", i, sheet.name(), marker);
        println!("    Size: {} rows x {} columns", sheet.rows(), sheet.cols());

        if let Some(range) = sheet.used_range() {
            println!("    Used range: {}", range);
        } else {
            println!("    Used range: empty");
        }
        println!("    Formulas: {}", formula_count);
    }

    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let workbook = open(input)?;

    for (i, sheet) in workbook.worksheets().enumerate() {
        println!("{}\t{}", i, sheet.name());
    }

    Ok(())
}
