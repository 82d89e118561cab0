use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

/// Strip surrounding double quotes and ASCII whitespace, in any mix.
/// A no-break space (Latin-1 0xA0) is data and stays.
pub fn clean_str(raw: &str) -> String {
    raw.trim_matches(|c: char| c == '"' || c.is_ascii_whitespace())
        .to_string()
}

/// Keep the first occurrence of a name; later ones get `_1`, `_2`, ...
/// counted per name. A suffixed name that is already taken (say a literal
/// `A_1` column) moves on to the next counter value.
pub fn make_column_names_unique(columns: &[String]) -> Vec<String> {
    let mut counters: HashMap<&str, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut unique = Vec::with_capacity(columns.len());
    for col in columns {
        let name = match counters.get_mut(col.as_str()) {
            None if !used.contains(col) => {
                counters.insert(col.as_str(), 0);
                col.clone()
            }
            _ => {
                let count = counters.entry(col.as_str()).or_insert(0);
                loop {
                    *count += 1;
                    let candidate = format!("{}_{}", col, count);
                    if !used.contains(&candidate) {
                        break candidate;
                    }
                }
            }
        };
        used.insert(name.clone());
        unique.push(name);
    }
    unique
}

/// Apply a placeholder → label map. A rename that would collide with a name
/// already in use is skipped so the header stays unique.
pub fn apply_renames(columns: &mut [String], renames: &BTreeMap<String, String>) {
    let mut in_use: HashSet<String> = columns.iter().cloned().collect();
    for col in columns.iter_mut() {
        let Some(target) = renames.get(col.as_str()) else {
            continue;
        };
        if target == col {
            continue;
        }
        if in_use.contains(target) {
            warn!(from = %col, to = %target, "rename target already present; keeping current name");
            continue;
        }
        in_use.remove(col.as_str());
        in_use.insert(target.clone());
        *col = target.clone();
    }
}
