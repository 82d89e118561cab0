use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, StringArray},
    compute::cast,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::Compression,
    file::properties::WriterProperties,
};
use std::{fs::File, path::Path, sync::Arc};
use tracing::info;

use super::StagedFile;
use crate::table::Table;

/// Arrow schema for a table: every column nullable Utf8.
fn string_schema(table: &Table) -> Schema {
    Schema::new(
        table
            .headers
            .iter()
            .map(|h| Field::new(h, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    )
}

/// Encode `table` as Parquet into a temp file beside `path`; the missing
/// marker becomes a real null.
pub fn stage_parquet<P: AsRef<Path>>(table: &Table, path: P) -> Result<StagedFile> {
    let path = path.as_ref();
    if table.headers.is_empty() {
        return Err(anyhow!("cannot write a table without columns to {:?}", path));
    }

    let schema = Arc::new(string_schema(table));
    let columns: Vec<ArrayRef> = (0..table.num_columns())
        .map(|i| {
            let arr: StringArray = table.rows.iter().map(|r| r[i].as_deref()).collect();
            Arc::new(arr) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let (mut tmp, target) = StagedFile::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(tmp.as_file_mut(), schema, Some(props))
        .context("creating Arrow writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing Arrow writer")?;

    Ok(StagedFile::new(tmp, target, table.num_rows()))
}

/// Write `table` to Parquet at `path`, replacing any previous file.
#[tracing::instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display()))]
pub fn write_parquet<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let staged = stage_parquet(table, path)?;
    let rows = staged.rows;
    staged.commit()?;
    info!(rows, "wrote parquet");
    Ok(())
}

/// Read a Parquet file into a table; nulls read back as missing.
pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading parquet metadata of {:?}", path))?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut table = Table::new(headers);
    for batch in reader {
        let batch = batch.context("reading record batch")?;
        let columns: Vec<ArrayRef> = batch
            .columns()
            .iter()
            .map(|c| cast(c, &DataType::Utf8))
            .collect::<Result<_, _>>()
            .context("casting column to Utf8")?;
        let strings: Vec<&StringArray> = columns
            .iter()
            .map(|c| {
                c.as_any()
                    .downcast_ref::<StringArray>()
                    .ok_or_else(|| anyhow!("column is not Utf8 after cast"))
            })
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            table.rows.push(
                strings
                    .iter()
                    .map(|arr| (!arr.is_null(row)).then(|| arr.value(row).to_string()))
                    .collect(),
            );
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_marker_round_trips_as_null() -> Result<()> {
        let table = Table {
            headers: vec!["Herkomst".into(), "2017".into(), "Unknown".into()],
            rows: vec![
                vec![Some("Dansk".into()), Some("".into()), None],
                vec![None, Some("42".into()), Some("3".into())],
            ],
        };
        let dir = TempDir::new()?;
        let path = dir.path().join("combined.parquet");
        write_parquet(&table, &path)?;

        let back = read_parquet(&path)?;
        assert_eq!(back, table);
        Ok(())
    }

    #[test]
    fn failed_replace_cleans_up_temp_file() -> Result<()> {
        let table = Table {
            headers: vec!["Region".into()],
            rows: vec![vec![Some("Nordjylland".into())]],
        };
        let dir = TempDir::new()?;
        let staged = stage_parquet(&table, dir.path().join("combined.parquet"))?;
        // something else claims the target before the rename
        let blocker = dir.path().join("combined.parquet");
        std::fs::create_dir(&blocker)?;
        std::fs::write(blocker.join("keep"), "x")?;

        assert!(staged.commit().is_err());
        let entries: Vec<_> = std::fs::read_dir(dir.path())?
            .filter_map(|e| e.ok().map(|e| e.file_name()))
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("combined.parquet")]);
        Ok(())
    }
}
