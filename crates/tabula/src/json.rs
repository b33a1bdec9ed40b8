//! JSON (de)serialization of whole workbooks
//!
//! The document is `{"sheets": [...], "active": n}` where each sheet is
//! `{"name", "rows", "cols", "cells": {"A1": {"raw", "style"}}}`.

use serde::Deserialize;
use serde_json::Value;
use tabula_core::{Workbook, Worksheet};

use crate::error::{Error, Result};

#[derive(Deserialize)]
struct WorkbookDocument {
    sheets: Vec<Worksheet>,
    #[serde(default)]
    active: usize,
}

/// Serialize a workbook to pretty-printed JSON
pub fn to_json(workbook: &Workbook) -> Result<String> {
    Ok(serde_json::to_string_pretty(workbook)?)
}

/// Parse a workbook from JSON.
///
/// The document must be an object whose `sheets` is a non-empty array of
/// sheets. An out-of-range `active` is clamped, empty cells are dropped and
/// each sheet grows to fit its cells.
pub fn from_json(text: &str) -> Result<Workbook> {
    let value: Value = serde_json::from_str(text)?;
    if !value.get("sheets").map_or(false, Value::is_array) {
        return Err(Error::InvalidDocument("`sheets` must be an array".into()));
    }

    let document: WorkbookDocument = serde_json::from_value(value)?;
    if document.sheets.is_empty() {
        return Err(Error::InvalidDocument("a workbook needs at least one sheet".into()));
    }

    let sheets = document
        .sheets
        .into_iter()
        .map(|mut sheet| {
            sheet.normalize();
            sheet
        })
        .collect();

    Ok(Workbook::from_sheets(sheets, document.active)?)
}
