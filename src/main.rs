use anyhow::{Context, Result};
use clap::Parser;
use shelterstats::{
    config::RunConfig,
    pipeline::{self, RunOutcome},
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Clean the shelter-stay exports (Age, Ancestry, Region) and merge them
/// into one CSV.
#[derive(Parser, Debug)]
#[command(name = "shelterstats", version, about)]
struct Cli {
    /// YAML run configuration; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the input files and outputs resolve against
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Combined CSV output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the combined table as Parquet
    #[arg(long)]
    parquet: Option<PathBuf>,

    /// Boilerplate rows before the header row
    #[arg(long)]
    skip_rows: Option<usize>,

    /// Text written for missing cells
    #[arg(long)]
    missing_repr: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::from_yaml_file(path)
                .with_context(|| format!("loading config {:?}", path))?,
            None => RunConfig::default(),
        };
        if let Some(dir) = self.input_dir {
            cfg.input_dir = dir;
        }
        if let Some(out) = self.output {
            cfg.output = out;
        }
        if let Some(p) = self.parquet {
            cfg.parquet_output = Some(p);
        }
        if let Some(n) = self.skip_rows {
            cfg.skip_rows = n;
        }
        if let Some(repr) = self.missing_repr {
            cfg.missing_repr = repr;
        }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let cfg = Cli::parse().into_config()?;
    info!(
        input_dir = %cfg.input_dir.display(),
        datasets = cfg.datasets.len(),
        "startup"
    );

    // ─── 3) run ──────────────────────────────────────────────────────
    match pipeline::run(&cfg)? {
        RunOutcome::Written { rows, columns, .. } => {
            info!(rows, columns, "done");
        }
        RunOutcome::Aborted { failed } => {
            warn!(failed = ?failed, "no output written");
        }
    }
    Ok(())
}
