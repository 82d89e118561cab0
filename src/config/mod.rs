// src/config/mod.rs
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use crate::error::ConfigError;

pub const DEFAULT_OUTPUT: &str = "Combined_Cleaned_Data.csv";
pub const DEFAULT_MISSING_REPR: &str = "NA";

/// Placeholder header → label, for the shelter-stay exports.
/// Padded header cells come out as `nan`, `nan_1`, ... once made unique.
pub fn default_renames() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    map.insert("nan_1".to_string(), "Unknown".to_string());
    for (i, year) in (2017..=2023).enumerate() {
        map.insert(format!("nan_{}", i + 2), year.to_string());
    }
    map
}

/// One input table and how to label its placeholder columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetConfig {
    pub name: String,
    pub file: PathBuf,
    #[serde(default = "default_renames")]
    pub renames: BTreeMap<String, String>,
}

impl DatasetConfig {
    pub fn new(name: &str, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            file: file.into(),
            renames: default_renames(),
        }
    }
}

/// Raw-format knobs shared by every dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Leading boilerplate rows dropped before the header row.
    pub skip_rows: usize,
    pub delimiter: char,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_rows: 2,
            delimiter: ';',
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Dataset paths and outputs resolve against this directory.
    pub input_dir: PathBuf,
    pub output: PathBuf,
    pub parquet_output: Option<PathBuf>,
    pub skip_rows: usize,
    pub delimiter: char,
    /// How a missing cell is written to CSV. Must be non-empty so a missing
    /// cell never reads the same as a blank one.
    pub missing_repr: String,
    /// Concatenation order is the order listed here.
    pub datasets: Vec<DatasetConfig>,
}

impl Default for RunConfig {
    fn default() -> Self {
        let parse = ParseOptions::default();
        Self {
            input_dir: PathBuf::from("."),
            output: PathBuf::from(DEFAULT_OUTPUT),
            parquet_output: None,
            skip_rows: parse.skip_rows,
            delimiter: parse.delimiter,
            missing_repr: DEFAULT_MISSING_REPR.to_string(),
            datasets: vec![
                DatasetConfig::new("age", "Age.csv"),
                DatasetConfig::new("ancestry", "Ancestry.csv"),
                DatasetConfig::new("region", "Region.csv"),
            ],
        }
    }
}

impl RunConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: RunConfig = serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.datasets.is_empty() {
            return Err(ConfigError::Invalid("no datasets configured".into()));
        }
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(ConfigError::Invalid(
                "delimiter cannot be a line terminator".into(),
            ));
        }
        if self.missing_repr.is_empty() {
            return Err(ConfigError::Invalid(
                "missing_repr must be non-empty to stay distinct from blank cells".into(),
            ));
        }
        let mut names = HashSet::new();
        for ds in &self.datasets {
            if !names.insert(ds.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "dataset {:?} listed twice",
                    ds.name
                )));
            }
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            skip_rows: self.skip_rows,
            delimiter: self.delimiter,
        }
    }

    pub fn dataset_path(&self, ds: &DatasetConfig) -> PathBuf {
        self.input_dir.join(&ds.file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.input_dir.join(&self.output)
    }

    pub fn parquet_path(&self) -> Option<PathBuf> {
        self.parquet_output.as_ref().map(|p| self.input_dir.join(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_renames_cover_unknown_and_years() {
        let map = default_renames();
        assert_eq!(map.len(), 8);
        assert_eq!(map["nan_1"], "Unknown");
        assert_eq!(map["nan_2"], "2017");
        assert_eq!(map["nan_8"], "2023");
    }

    #[test]
    fn defaults_list_three_datasets_in_order() {
        let cfg = RunConfig::default();
        let names: Vec<&str> = cfg.datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["age", "ancestry", "region"]);
        assert_eq!(cfg.output, PathBuf::from("Combined_Cleaned_Data.csv"));
        assert_eq!(cfg.parse_options(), ParseOptions::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(
            tmp,
            r#"
input_dir: data
parquet_output: combined.parquet
datasets:
  - name: age
    file: Age.csv
  - name: municipality
    file: Municipality.csv
    renames:
      nan_1: Ukendt
"#
        )?;
        let cfg = RunConfig::from_yaml_file(tmp.path())?;
        assert_eq!(cfg.skip_rows, 2);
        assert_eq!(cfg.delimiter, ';');
        assert_eq!(cfg.datasets.len(), 2);
        assert_eq!(cfg.datasets[0].renames, default_renames());
        assert_eq!(cfg.datasets[1].renames.len(), 1);
        assert_eq!(
            cfg.dataset_path(&cfg.datasets[1]),
            PathBuf::from("data/Municipality.csv")
        );
        assert_eq!(
            cfg.parquet_path(),
            Some(PathBuf::from("data/combined.parquet"))
        );
        Ok(())
    }

    #[test]
    fn duplicate_dataset_names_are_rejected() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(
            tmp,
            "datasets:\n  - {{name: age, file: a.csv}}\n  - {{name: age, file: b.csv}}"
        )?;
        let err = RunConfig::from_yaml_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        Ok(())
    }

    #[test]
    fn empty_missing_repr_is_rejected() -> Result<()> {
        assert_eq!(RunConfig::default().missing_repr, "NA");

        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "missing_repr: \"\"")?;
        let err = RunConfig::from_yaml_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        Ok(())
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = RunConfig::from_yaml_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
