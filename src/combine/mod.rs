// src/combine/mod.rs
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, error, info};

use crate::config::RunConfig;
use crate::error::CombineError;
use crate::process::normalize;
use crate::table::Table;

/// Column names of all tables, in first-seen order.
pub fn union_columns(tables: &[Table]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut columns = Vec::new();
    for t in tables {
        for h in &t.headers {
            if seen.insert(h.as_str()) {
                columns.push(h.clone());
            }
        }
    }
    columns
}

/// Widen every table to the shared column set, stack them in the given
/// order, then drop duplicate rows.
pub fn combine_tables(tables: &[Table]) -> Table {
    let columns = union_columns(tables);
    let mut combined = Table::new(columns.clone());
    for t in tables {
        combined.rows.extend(t.reindex(&columns).rows);
    }
    let dropped = combined.dedup_rows();
    debug!(
        columns = combined.num_columns(),
        rows = combined.num_rows(),
        dropped,
        "combined tables"
    );
    combined
}

/// Normalize every configured dataset, then combine them. All-or-nothing:
/// if any dataset yields no result, nothing is combined.
pub fn normalize_and_combine(cfg: &RunConfig) -> Result<Table, CombineError> {
    let opts = cfg.parse_options();

    // independent per file; collect keeps the configured order
    let results: Vec<(String, Option<Table>)> = cfg
        .datasets
        .par_iter()
        .map(|ds| {
            let table = normalize(cfg.dataset_path(ds), &ds.renames, &opts);
            (ds.name.clone(), table)
        })
        .collect();

    let failed: Vec<String> = results
        .iter()
        .filter(|(_, t)| t.is_none())
        .map(|(name, _)| name.clone())
        .collect();
    if !failed.is_empty() {
        error!(failed = ?failed, "merge aborted");
        return Err(CombineError::MergeAborted { failed });
    }

    let tables: Vec<Table> = results.into_iter().filter_map(|(_, t)| t).collect();
    for (ds, t) in cfg.datasets.iter().zip(&tables) {
        info!(
            dataset = %ds.name,
            columns = t.num_columns(),
            rows = t.num_rows(),
            "cleaned"
        );
    }
    Ok(combine_tables(&tables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| cell(s)).collect())
                .collect(),
        }
    }

    #[test]
    fn union_is_first_seen() {
        let a = table(&["X", "Y"], &[]);
        let b = table(&["Y", "Z"], &[]);
        let c = table(&["W", "X"], &[]);
        assert_eq!(union_columns(&[a, b, c]), vec!["X", "Y", "Z", "W"]);
    }

    #[test]
    fn absent_columns_get_missing_marker() {
        let a = table(&["X", "Y"], &[&["x1", "y1"]]);
        let b = table(&["Y", "Z"], &[&["y2", ""]]);
        let combined = combine_tables(&[a, b]);

        assert_eq!(combined.headers, vec!["X", "Y", "Z"]);
        assert_eq!(combined.rows[0], vec![cell("x1"), cell("y1"), None]);
        // Z was present but blank in B: that is not the missing marker
        assert_eq!(combined.rows[1], vec![None, cell("y2"), cell("")]);
    }

    #[test]
    fn rows_shared_across_sources_appear_once() {
        let a = table(&["X", "Y"], &[&["1", "2"], &["3", "4"]]);
        let b = table(&["Y", "X"], &[&["2", "1"], &["5", "6"]]);
        let combined = combine_tables(&[a, b]);
        assert_eq!(combined.num_rows(), 3);
        assert_eq!(combined.rows[2], vec![cell("6"), cell("5")]);
    }

    #[test]
    fn missing_dataset_aborts_the_merge() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("Age.csv"), "m\nm\nAlder;2017\n<20;1\n")?;
        fs::write(dir.path().join("Ancestry.csv"), "m\nm\nHerkomst;2017\nDansk;2\n")?;

        let cfg = RunConfig {
            input_dir: dir.path().to_path_buf(),
            ..RunConfig::default()
        };
        match normalize_and_combine(&cfg) {
            Err(CombineError::MergeAborted { failed }) => assert_eq!(failed, vec!["region"]),
            Ok(_) => panic!("merge should not proceed without region"),
        }
        Ok(())
    }

    #[test]
    fn combines_in_configured_order() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("b.csv"), "m\nm\nB;Year\nb1;2020\n")?;
        fs::write(dir.path().join("a.csv"), "m\nm\nA;Year\na1;2019\n")?;

        let cfg = RunConfig {
            input_dir: dir.path().to_path_buf(),
            datasets: vec![DatasetConfig::new("b", "b.csv"), DatasetConfig::new("a", "a.csv")],
            ..RunConfig::default()
        };
        let combined = normalize_and_combine(&cfg)?;
        assert_eq!(combined.headers, vec!["B", "Year", "A"]);
        assert_eq!(
            combined.rows,
            vec![
                vec![cell("b1"), cell("2020"), None],
                vec![None, cell("2019"), cell("a1")],
            ]
        );
        Ok(())
    }
}
