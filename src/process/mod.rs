// src/process/mod.rs
pub mod raw_table;
pub mod utils;

use std::{collections::BTreeMap, path::Path};
use tracing::{debug, error, info, warn};

use crate::config::ParseOptions;
use crate::error::NormalizeError;
use crate::table::Table;
use raw_table::{expand_rows, RawTable};
use utils::{apply_renames, clean_str, make_column_names_unique};

/// Normalize one raw export, reporting failure on the console instead of
/// returning it. `None` means the file contributes nothing.
pub fn normalize<P: AsRef<Path>>(
    path: P,
    renames: &BTreeMap<String, String>,
    opts: &ParseOptions,
) -> Option<Table> {
    let path = path.as_ref();
    match try_normalize(path, renames, opts) {
        Ok(table) => Some(table),
        Err(e @ NormalizeError::MissingFile { .. }) => {
            warn!("{}", e);
            None
        }
        Err(e) => {
            error!("Error processing file {}: {}", path.display(), e);
            None
        }
    }
}

/// Turn one raw export into a clean table:
/// 1) drop the boilerplate rows
/// 2) split each packed row into fields, padding ragged rows
/// 3) promote the first row to the header
/// 4) trim quotes and whitespace from headers and cells
/// 5) make headers unique, then apply the placeholder renames
/// 6) drop duplicate rows
#[tracing::instrument(level = "debug", skip(path, renames, opts), fields(path = %path.as_ref().display()))]
pub fn try_normalize<P: AsRef<Path>>(
    path: P,
    renames: &BTreeMap<String, String>,
    opts: &ParseOptions,
) -> Result<Table, NormalizeError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(NormalizeError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    info!("Processing file: {}", path.display());

    let raw = RawTable::read(path)?;
    let rows = raw.data_rows(opts.skip_rows);
    if rows.is_empty() {
        return Err(NormalizeError::parse(
            path,
            format!(
                "expected a header row after {} leading rows, found {} rows in total",
                opts.skip_rows,
                raw.lines.len()
            ),
        ));
    }

    let mut expanded = expand_rows(rows, opts.delimiter).into_iter();
    let header_row = expanded
        .next()
        .ok_or_else(|| NormalizeError::parse(path, "no header row"))?;

    let trimmed: Vec<String> = header_row
        .iter()
        .map(|h| clean_str(h.as_deref().unwrap_or(raw_table::PLACEHOLDER_HEADER)))
        .collect();
    let mut headers = make_column_names_unique(&trimmed);
    apply_renames(&mut headers, renames);

    let mut table = Table::new(headers);
    table.rows = expanded
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.map(|v| clean_str(&v)))
                .collect()
        })
        .collect();

    let dropped = table.dedup_rows();
    debug!(
        columns = table.num_columns(),
        rows = table.num_rows(),
        dropped,
        "normalized"
    );
    Ok(table)
}
