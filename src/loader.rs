//! Dataset loading for the dropdown lookup and the reference fact table.
//!
//! Files are decoded as Latin-1 and every column is read as text. A failed
//! load never aborts the caller: it is logged and replaced by an empty table
//! that still carries the expected columns.

use crate::config::WizardConfig;
use crate::error::{Result, WizardError};
use crate::table::Table;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{error, info};

pub const DROPDOWN_COLUMNS: &[&str] = &["Country", "Company"];

pub const REFERENCE_COLUMNS: &[&str] = &[
    "DB_Name",
    "Region",
    "Country",
    "Company",
    "Technology",
    "Metric",
    "Definition",
];

/// UTF-8 byte order mark as it reads after Latin-1 decoding.
const LATIN1_BOM: &str = "\u{ef}\u{bb}\u{bf}";

/// Both input tables of one load.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub dropdown: Table,
    pub reference: Table,
}

impl Datasets {
    pub fn load(config: &WizardConfig) -> Self {
        Self {
            dropdown: load_table(&config.dropdown_path(), DROPDOWN_COLUMNS),
            reference: load_table(&config.reference_path(), REFERENCE_COLUMNS),
        }
    }

    /// False when either table came back empty.
    pub fn is_usable(&self) -> bool {
        !self.dropdown.is_empty() && !self.reference.is_empty()
    }
}

/// Load a CSV file, substituting an empty table with `expected` columns on
/// any failure.
pub fn load_table(path: &Path, expected: &[&str]) -> Table {
    match try_load_table(path, expected) {
        Ok(table) => {
            info!("Loaded {} rows from {}", table.height(), path.display());
            table
        }
        Err(e) => {
            error!("Error loading {}: {}", path.display(), e);
            Table::empty_with_schema(expected)
        }
    }
}

pub fn try_load_table(path: &Path, expected: &[&str]) -> Result<Table> {
    let bytes = std::fs::read(path)?;
    parse_csv(&bytes, expected)
}

/// Parse raw CSV bytes into a table with normalized headers.
pub fn parse_csv(bytes: &[u8], expected: &[&str]) -> Result<Table> {
    let text = decode_latin1(bytes);

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()?;

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| normalize_header(name))
        .collect();
    df.set_column_names(names.as_slice())?;

    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|column| !names.iter().any(|name| name == column))
        .collect();
    if !missing.is_empty() {
        return Err(WizardError::Load(format!(
            "missing expected columns: {}",
            missing.join(", ")
        )));
    }

    Ok(Table::from_frame(df))
}

/// Every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

pub fn normalize_header(name: &str) -> String {
    name.trim()
        .trim_start_matches('\u{feff}')
        .trim_start_matches(LATIN1_BOM)
        .trim()
        .to_string()
}
