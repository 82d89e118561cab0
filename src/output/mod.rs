// src/output/mod.rs
pub mod csv_file;
pub mod parquet_file;

pub use csv_file::{read_csv, stage_csv, write_csv};
pub use parquet_file::{read_parquet, stage_parquet, write_parquet};

use anyhow::{anyhow, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

/// A fully written output sitting in a temp file next to its target.
/// Dropping it without [`StagedFile::commit`] deletes the temp file.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    target: PathBuf,
    /// Data rows written.
    pub rows: usize,
}

impl StagedFile {
    /// Open a temp file in the target's directory, so the final rename
    /// stays on one filesystem.
    pub(crate) fn create(target: &Path) -> Result<(NamedTempFile, PathBuf)> {
        if target.is_dir() {
            return Err(anyhow!("output path {:?} is a directory", target));
        }
        let dir = match target.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating output directory {:?}", parent))?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };
        let tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("creating temp file in {:?}", dir))?;
        Ok((tmp, target.to_path_buf()))
    }

    pub(crate) fn new(tmp: NamedTempFile, target: PathBuf, rows: usize) -> Self {
        Self { tmp, target, rows }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Replace the target with the staged content in one rename.
    pub fn commit(self) -> Result<PathBuf> {
        let target = self.target;
        self.tmp
            .persist(&target)
            .map_err(|e| anyhow!("replacing {:?}: {}", target, e.error))?;
        debug!(path = %target.display(), "committed");
        Ok(target)
    }
}
