use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ToolError;
use crate::store::{StoreType, default_store_path};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub r#type: StoreType,
    pub path: Option<PathBuf>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tiledbsc").join("config.toml"))
}

/// Reads the config file at `path`; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ToolError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn load_config() -> Result<Config, ToolError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

/// Command-line values win over the config file, which wins over defaults.
pub fn resolve_store_config(
    config: Config,
    cli_type: Option<StoreType>,
    cli_path: Option<PathBuf>,
) -> (StoreType, PathBuf) {
    let store_type = cli_type.unwrap_or(config.store.r#type);
    let store_path = cli_path
        .or(config.store.path)
        .unwrap_or_else(default_store_path);

    (store_type, store_path)
}
