//! Store selection for the command line.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tiledbsc_core::{Manifest, MemoryGroupStore};
use tiledbsc_rocks::RocksGroupStore;

use crate::error::ToolError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    /// A RocksDB catalog directory.
    #[default]
    Rocks,
    /// A JSON or YAML layout manifest, loaded into memory.
    Manifest,
}

impl std::str::FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rocks" | "rocksdb" => Ok(StoreType::Rocks),
            "manifest" => Ok(StoreType::Manifest),
            _ => Err(format!("unknown store type: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Rocks => write!(f, "rocks"),
            StoreType::Manifest => write!(f, "manifest"),
        }
    }
}

/// Runtime-selected store.
pub enum AnyStore {
    Rocks(RocksGroupStore),
    Manifest(MemoryGroupStore),
}

impl AnyStore {
    pub fn open(store_type: StoreType, path: impl AsRef<Path>) -> Result<Self, ToolError> {
        match store_type {
            StoreType::Rocks => Ok(Self::Rocks(RocksGroupStore::open(path)?)),
            StoreType::Manifest => {
                let store = MemoryGroupStore::new();
                load_manifest(path)?.apply(&store)?;
                Ok(Self::Manifest(store))
            }
        }
    }
}

/// Reads a manifest, as YAML for `.yaml`/`.yml` files and JSON otherwise.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest, ToolError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ToolError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_lowercase().as_str(), "yaml" | "yml"));

    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tiledbsc")
        .join("catalog")
}
