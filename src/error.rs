//! Typed domain errors
//!
//! Application seams use `anyhow::Result`; these enums cover the failures
//! that callers may want to inspect or report precisely.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading or validating the lab catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid identifier '{0}' (expected lower-case kebab-case)")]
    InvalidId(String),

    #[error("duplicate {kind} identifier '{id}'")]
    Duplicate { kind: &'static str, id: String },

    #[error("experiments listed for unknown textbook '{0}'")]
    UnknownTextbook(String),

    #[error("{context} references unknown experiment '{id}'")]
    UnknownExperiment { context: &'static str, id: String },
}

/// Failure while constructing a media resolver
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("invalid media base url '{0}'")]
    InvalidBaseUrl(String),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
