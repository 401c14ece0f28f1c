//! Error types for the layers around the scoring core.
//!
//! The core itself (resolver, scorers, aggregator, ranking) is total and never
//! returns these; they cover config files, catalog files and query filters.

use std::path::PathBuf;
use thiserror::Error;

/// Loading or validating the ranker configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error reading config at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config ({origin})")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{var} points to non-existent path {path:?}")]
    MissingEnvPath { var: &'static str, path: PathBuf },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Loading a device catalog file.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("IO error reading catalog at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("catalog must be a list or an object of device records, got {0}")]
    Shape(&'static str),

    #[error("{var} points to non-existent path {path:?}")]
    MissingEnvPath { var: &'static str, path: PathBuf },
}

/// Rejected query filter input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid max_price filter: {0:?}")]
    InvalidMaxPrice(String),
}
