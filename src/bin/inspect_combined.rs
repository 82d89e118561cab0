use anyhow::{Context, Result};
use clap::Parser;
use shelterstats::{
    inspect::{summarize, TableSummary},
    output::{read_csv, read_parquet},
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

/// Print row/column statistics for a combined CSV or Parquet file.
#[derive(Parser, Debug)]
#[command(name = "inspect_combined")]
struct Args {
    file: PathBuf,

    /// Emit JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// CSV text that stands for a missing cell
    #[arg(long, default_value = shelterstats::config::DEFAULT_MISSING_REPR)]
    missing_repr: String,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let table = if is_parquet(&args.file) {
        read_parquet(&args.file)
    } else {
        read_csv(&args.file, &args.missing_repr)
    }
    .with_context(|| format!("reading {}", args.file.display()))?;

    let summary = summarize(&table);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&args.file, &summary);
    }
    Ok(())
}

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("parquet"))
}

fn print_summary(path: &Path, summary: &TableSummary) {
    println!("=== {} ===", path.display());
    println!("Rows:    {}", summary.rows);
    println!("Columns: {}", summary.columns);
    println!();
    println!(
        "{:<30} | {:>8} | {:>8} | {:>8} | {:>8}",
        "column", "present", "missing", "blank", "distinct"
    );
    for s in &summary.column_stats {
        println!(
            "{:<30} | {:>8} | {:>8} | {:>8} | {:>8}",
            s.name, s.present, s.missing, s.blank, s.distinct
        );
    }
}
