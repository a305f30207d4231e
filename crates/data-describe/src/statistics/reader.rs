//! Tabular file loading with fallback strategies.

use crate::error::{DescribeError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Load a delimited file with a header row into a DataFrame.
///
/// Blank lines are skipped wherever they occur, so trailing empty lines do
/// not turn into rows of nulls. The whole file is used for schema inference
/// so that a late non-numeric value does not break an early integer guess.
/// When the standard read fails the content is cleaned further (doubled
/// quotes collapsed) and read once more. Any remaining failure is a
/// [`DescribeError::Parse`] naming the file.
pub(crate) fn load_table(path: &Path, separator: u8) -> Result<DataFrame> {
    let bytes = std::fs::read(path).map_err(|e| DescribeError::parse(path, e))?;
    let content = String::from_utf8_lossy(&bytes);

    let rows = drop_blank_lines(&content);
    if rows.is_empty() {
        return Err(DescribeError::parse(path, "file has no header row"));
    }

    // Strategy 1: standard loading with quote handling
    let standard = CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"')),
        )
        .into_reader_with_file_handle(Cursor::new(rows))
        .finish();

    match standard {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading of {} failed: {}", path.display(), e),
    }

    // Strategy 2: pre-clean content
    let cleaned = clean_table_content(&content);

    CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .into_reader_with_file_handle(Cursor::new(cleaned))
        .finish()
        .map_err(|e| DescribeError::parse(path, e))
}

/// Drop empty and whitespace-only lines.
fn drop_blank_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse doubled quotes and drop blank lines.
fn clean_table_content(content: &str) -> String {
    drop_blank_lines(&content.replace("\"\"\"", "\"").replace("\"\"", "\""))
}
