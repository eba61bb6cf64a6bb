//! Error types for entity definition loading

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid Rust entity source: {0}")]
    Syntax(#[from] syn::Error),

    #[error("invalid TOML entity document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON entity document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported entity file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("entity '{0}' is not defined")]
    UnknownEntity(String),

    #[error("entity '{entity}' extends undefined type '{superclass}'")]
    UnknownSuperclass { entity: String, superclass: String },

    #[error("inheritance cycle through '{0}'")]
    InheritanceCycle(String),
}

pub type Result<T> = std::result::Result<T, LoadError>;
