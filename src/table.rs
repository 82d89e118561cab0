// src/table.rs
use std::collections::{HashMap, HashSet};

/// One cell. `None` is the missing marker: the column did not exist in the
/// source (or the row was too short), which is different from `Some("")`.
pub type Cell = Option<String>;

/// A rectangular in-memory table. Every row holds exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Drop rows identical to an earlier row, keeping the first occurrence.
    /// Returns how many rows were removed.
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<Cell>> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// Re-lay this table out under `columns`. Columns this table lacks are
    /// filled with the missing marker; columns not listed are dropped.
    pub fn reindex(&self, columns: &[String]) -> Table {
        let by_name: HashMap<&str, usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();
        let mapping: Vec<Option<usize>> = columns
            .iter()
            .map(|c| by_name.get(c.as_str()).copied())
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                mapping
                    .iter()
                    .map(|src| src.and_then(|i| row.get(i).cloned().flatten()))
                    .collect()
            })
            .collect();

        Table {
            headers: columns.to_vec(),
            rows,
        }
    }
}
