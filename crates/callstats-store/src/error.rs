use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("CDR snapshot not found: {0}")]
    InputNotFound(PathBuf),

    #[error("cannot read CDR snapshot {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CDR snapshot {path} is not valid CSV: {source}")]
    InputMalformed {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("CDR snapshot {path} has no {column:?} column")]
    MissingColumn { path: PathBuf, column: String },

    #[error("no CDR snapshot named like DD-MM-YYYY.csv in {0}")]
    NoSnapshot(PathBuf),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("cannot read configuration {path}: {source}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration {path}: {source}")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: callstats_core::ConfigError,
    },

    #[error("refusing to overwrite existing file {0}")]
    AlreadyExists(PathBuf),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
