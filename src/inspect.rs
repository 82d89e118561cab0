use serde::Serialize;
use std::collections::HashSet;

use crate::table::Table;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ColumnStats {
    pub name: String,
    /// Cells holding a value (blank included).
    pub present: usize,
    pub missing: usize,
    pub blank: usize,
    /// Distinct present values, blank counted once.
    pub distinct: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
    pub column_stats: Vec<ColumnStats>,
}

pub fn column_stats(table: &Table) -> Vec<ColumnStats> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut stats = ColumnStats {
                name: name.clone(),
                present: 0,
                missing: 0,
                blank: 0,
                distinct: 0,
            };
            let mut values: HashSet<&str> = HashSet::new();
            for row in &table.rows {
                match row.get(i).and_then(|c| c.as_deref()) {
                    None => stats.missing += 1,
                    Some(v) => {
                        stats.present += 1;
                        if v.is_empty() {
                            stats.blank += 1;
                        }
                        values.insert(v);
                    }
                }
            }
            stats.distinct = values.len();
            stats
        })
        .collect()
}

pub fn summarize(table: &Table) -> TableSummary {
    TableSummary {
        rows: table.num_rows(),
        columns: table.num_columns(),
        column_stats: column_stats(table),
    }
}
