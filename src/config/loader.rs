// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigFile, ConfigOverrides, SupervisorConfig};
use crate::config::validate::validate_config;
use crate::errors::{LogexecError, Result};

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; semantic checks happen in
/// [`validate_config`] once CLI overrides have been applied.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        LogexecError::ConfigError(format!("reading config file at {:?}: {}", path, e))
    })?;

    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Build the effective configuration for a run.
///
/// - Reads the TOML file if one was given.
/// - Applies CLI overrides on top (CLI > file > defaults).
/// - Validates the result.
pub fn load_and_validate(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<SupervisorConfig> {
    let file = match path {
        Some(p) => load_from_path(p)?,
        None => ConfigFile::default(),
    };

    let cfg = SupervisorConfig::resolve(file, overrides);
    validate_config(&cfg)?;
    Ok(cfg)
}
