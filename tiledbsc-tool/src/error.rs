use std::path::PathBuf;

use thiserror::Error;
use tiledbsc_core::GroupError;
use tiledbsc_rocks::RocksGroupError;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Catalog error: {0}")]
    Rocks(#[from] RocksGroupError),

    #[error("Manifest error: {0}")]
    Group(#[from] GroupError),
}
