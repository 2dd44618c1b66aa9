//! CSV decoding into a raw grid, and template generation.

use crate::error::CoreError;
use crate::types::RawGrid;

use super::rules::ImportTypeConfig;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode an uploaded CSV into a raw grid.
///
/// Fields are trimmed, quoting follows RFC 4180, and rows may have differing
/// lengths. Blank lines are dropped; a row of empty fields (`,,,`) is kept so
/// the validator can report it.
pub fn parse_csv_grid(data: &[u8]) -> Result<RawGrid, CoreError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

/// Build the downloadable template: the header row followed by sample rows.
pub fn build_template_csv(config: &ImportTypeConfig) -> Result<String, CoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(config.template_columns())?;
    for row in &config.sample_data {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Internal(format!("Failed to flush CSV template: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| CoreError::Internal(format!("CSV template is not UTF-8: {e}")))
}
