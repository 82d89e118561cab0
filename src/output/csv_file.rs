use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{collections::HashSet, io::BufWriter, path::Path};
use tracing::{info, warn};

use super::StagedFile;
use crate::table::Table;

/// Render `table` as comma-separated UTF-8 (header row, no index column)
/// into a temp file beside `path`. Missing cells render as `missing_repr`;
/// a row whose rendered text repeats an earlier one is not written twice.
pub fn stage_csv<P: AsRef<Path>>(table: &Table, path: P, missing_repr: &str) -> Result<StagedFile> {
    let (mut tmp, target) = StagedFile::create(path.as_ref())?;

    let mut written = 0usize;
    {
        let mut wtr = WriterBuilder::new().from_writer(BufWriter::new(tmp.as_file_mut()));
        wtr.write_record(&table.headers)
            .context("writing CSV header")?;

        let mut seen: HashSet<Vec<&str>> = HashSet::with_capacity(table.num_rows());
        for (idx, row) in table.rows.iter().enumerate() {
            let rendered: Vec<&str> = row
                .iter()
                .map(|c| c.as_deref().unwrap_or(missing_repr))
                .collect();
            if !seen.insert(rendered.clone()) {
                continue;
            }
            wtr.write_record(&rendered)
                .with_context(|| format!("writing CSV row {}", idx))?;
            written += 1;
        }
        wtr.flush().context("flushing CSV writer")?;
    }

    let collapsed = table.num_rows() - written;
    if collapsed > 0 {
        warn!(
            collapsed,
            missing_repr, "rows identical once rendered were written once"
        );
    }
    Ok(StagedFile::new(tmp, target, written))
}

/// Write `table` to `path`, replacing any previous file as a whole.
/// Returns the number of data rows written.
#[tracing::instrument(level = "info", skip(table, path, missing_repr), fields(path = %path.as_ref().display()))]
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P, missing_repr: &str) -> Result<usize> {
    let staged = stage_csv(table, path, missing_repr)?;
    let rows = staged.rows;
    staged.commit()?;
    info!(rows, "wrote csv");
    Ok(rows)
}

/// Read a combined CSV back. A field equal to `missing_repr` reads as
/// missing.
pub fn read_csv<P: AsRef<Path>>(path: P, missing_repr: &str) -> Result<Table> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {:?}", path))?;

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("reading header of {:?}", path))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = Table::new(headers);
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error in {:?} at record {}", path, idx))?;
        table.rows.push(
            record
                .iter()
                .map(|f| (f != missing_repr).then(|| f.to_string()))
                .collect(),
        );
    }
    Ok(table)
}
