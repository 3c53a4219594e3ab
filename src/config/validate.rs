// src/config/validate.rs

use crate::config::model::SupervisorConfig;
use crate::errors::{LogexecError, Result};

/// Smallest usable line cap: room for one byte of text plus the `...`
/// truncation marker.
pub const MIN_MAX_LINE: usize = 4;

/// Run basic semantic validation against a resolved configuration.
///
/// This checks:
/// - `max_line >= 4`
/// - the tag is non-empty and contains no whitespace
/// - at least one syslog socket path is configured
pub fn validate_config(cfg: &SupervisorConfig) -> Result<()> {
    validate_max_line(cfg)?;
    validate_tag(cfg)?;
    validate_socket_paths(cfg)?;
    Ok(())
}

fn validate_max_line(cfg: &SupervisorConfig) -> Result<()> {
    if cfg.max_line < MIN_MAX_LINE {
        return Err(LogexecError::ConfigError(format!(
            "max_line must be >= {} (got {})",
            MIN_MAX_LINE, cfg.max_line
        )));
    }
    Ok(())
}

fn validate_tag(cfg: &SupervisorConfig) -> Result<()> {
    if cfg.tag.is_empty() {
        return Err(LogexecError::ConfigError("tag must not be empty".to_string()));
    }
    if cfg.tag.chars().any(char::is_whitespace) {
        return Err(LogexecError::ConfigError(format!(
            "tag must not contain whitespace (got {:?})",
            cfg.tag
        )));
    }
    Ok(())
}

fn validate_socket_paths(cfg: &SupervisorConfig) -> Result<()> {
    if cfg.socket_paths.is_empty() {
        return Err(LogexecError::ConfigError(
            "socket_paths must list at least one syslog socket".to_string(),
        ));
    }
    Ok(())
}
