use std::path::PathBuf;
use thiserror::Error;

/// Why one input file contributed nothing.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("File not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Parse { path: PathBuf, message: String },
}

impl NormalizeError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        NormalizeError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CombineError {
    #[error("One or more files could not be processed: {}", failed.join(", "))]
    MergeAborted { failed: Vec<String> },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
