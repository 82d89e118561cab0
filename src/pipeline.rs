// src/pipeline.rs
use anyhow::{Context, Result};
use std::{path::PathBuf, time::Instant};
use tracing::{error, info};

use crate::combine::normalize_and_combine;
use crate::config::RunConfig;
use crate::error::CombineError;
use crate::output::{stage_csv, stage_parquet, StagedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written {
        csv: PathBuf,
        parquet: Option<PathBuf>,
        rows: usize,
        columns: usize,
    },
    /// Some dataset produced nothing; outputs were left untouched.
    Aborted { failed: Vec<String> },
}

/// One full run: clean every dataset, merge, write the outputs.
pub fn run(cfg: &RunConfig) -> Result<RunOutcome> {
    cfg.validate().context("validating run config")?;
    let start = Instant::now();

    // 1) normalize + combine; a failed dataset is not an error for the run
    let combined = match normalize_and_combine(cfg) {
        Ok(t) => t,
        Err(err) => {
            error!("{}", err);
            let CombineError::MergeAborted { failed } = err;
            return Ok(RunOutcome::Aborted { failed });
        }
    };

    // 2) stage every output; nothing on disk changes until all are complete
    let csv_path = cfg.output_path();
    let staged_csv = stage_csv(&combined, &csv_path, &cfg.missing_repr)
        .with_context(|| format!("writing {:?}", csv_path))?;
    let staged_parquet = match cfg.parquet_path() {
        Some(p) => Some(stage_parquet(&combined, &p).with_context(|| format!("writing {:?}", p))?),
        None => None,
    };

    // 3) commit, secondary output first so a failure leaves the CSV as it was
    let rows = staged_csv.rows;
    let parquet = staged_parquet.map(StagedFile::commit).transpose()?;
    let csv = staged_csv.commit()?;

    info!(
        "All cleaned datasets have been merged and saved to '{}'.",
        csv.display()
    );
    info!(elapsed = ?start.elapsed(), rows, "run complete");

    Ok(RunOutcome::Written {
        csv,
        parquet,
        rows,
        columns: combined.num_columns(),
    })
}
