// src/process/raw_table.rs
use std::{fs, path::Path, path::PathBuf};
use tracing::debug;

use crate::error::NormalizeError;

/// Header name given to a column that only exists because some row was wider
/// than the header row.
pub const PLACEHOLDER_HEADER: &str = "nan";

/// A raw export as it sits on disk: a few boilerplate rows, then rows whose
/// values are all packed into one delimiter-joined string.
#[derive(Debug)]
pub struct RawTable {
    pub path: PathBuf,
    /// Non-blank lines, in file order.
    pub lines: Vec<String>,
}

impl RawTable {
    /// Read and decode `path` as Latin-1. Every byte maps to a char, so
    /// Danish letters in a non-UTF-8 export never fail the read.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, NormalizeError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| NormalizeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(path, &bytes))
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        let text = encoding_rs::mem::decode_latin1(bytes);
        let lines: Vec<String> = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.to_string())
            .collect();
        let path = path.into();
        debug!(path = %path.display(), lines = lines.len(), "decoded raw table");
        Self { path, lines }
    }

    /// Rows after dropping the first `skip_rows` unconditionally.
    pub fn data_rows(&self, skip_rows: usize) -> &[String] {
        self.lines.get(skip_rows..).unwrap_or(&[])
    }
}

/// Split one packed row on the literal delimiter. No quote handling: quotes
/// are stripped later, per field.
pub fn split_fields(row: &str, delimiter: char) -> Vec<String> {
    row.split(delimiter).map(str::to_string).collect()
}

/// Split every row and pad them all to the widest row. Padded positions in
/// the first (header) row become [`PLACEHOLDER_HEADER`]; padded data
/// positions are missing.
pub fn expand_rows(rows: &[String], delimiter: char) -> Vec<Vec<Option<String>>> {
    let split: Vec<Vec<String>> = rows.iter().map(|r| split_fields(r, delimiter)).collect();
    let width = split.iter().map(Vec::len).max().unwrap_or(0);

    split
        .into_iter()
        .enumerate()
        .map(|(i, fields)| {
            let mut out: Vec<Option<String>> = fields.into_iter().map(Some).collect();
            let pad = if i == 0 {
                Some(PLACEHOLDER_HEADER.to_string())
            } else {
                None
            };
            out.resize(width, pad);
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn split_keeps_empty_fields() {
        assert_eq!(
            split_fields(r#""Alder";"2017";;"#, ';'),
            vec![r#""Alder""#, r#""2017""#, "", ""]
        );
        assert_eq!(split_fields("", ';'), vec![""]);
    }

    #[test]
    fn decodes_latin1_bytes() -> Result<()> {
        // "Københavns" with ø as a single Latin-1 byte (0xF8)
        let bytes = b"meta\nmeta\nKommune;Antal\nK\xF8benhavn;12\n";
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(bytes)?;
        let raw = RawTable::read(tmp.path())?;
        assert_eq!(raw.lines.len(), 4);
        assert_eq!(raw.data_rows(2)[1], "København;12");
        Ok(())
    }

    #[test]
    fn crlf_and_blank_lines_are_dropped() {
        let raw = RawTable::from_bytes("x.csv", b"a\r\n\r\nb\r\nc;d\r\n  \r\n1;2\r\n");
        assert_eq!(raw.lines, vec!["a", "b", "c;d", "1;2"]);
        assert_eq!(raw.data_rows(2), &["c;d".to_string(), "1;2".to_string()]);
    }

    #[test]
    fn skip_past_end_is_empty() {
        let raw = RawTable::from_bytes("x.csv", b"only one line\n");
        assert!(raw.data_rows(2).is_empty());
    }

    #[test]
    fn ragged_rows_are_padded() {
        let rows = vec!["A;B".to_string(), "1;2;3;4".to_string(), "5".to_string()];
        let out = expand_rows(&rows, ';');
        assert_eq!(
            out[0],
            vec![
                Some("A".to_string()),
                Some("B".to_string()),
                Some("nan".to_string()),
                Some("nan".to_string())
            ]
        );
        assert_eq!(out[1].len(), 4);
        assert_eq!(out[2], vec![Some("5".to_string()), None, None, None]);
    }
}
