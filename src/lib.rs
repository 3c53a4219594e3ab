// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod sink;
pub mod supervise;
pub mod types;

use std::sync::Arc;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::errors::Result;
use crate::sink::{SinkPair, SyslogWriter};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI flags)
/// - the two syslog connections (stdout / stderr)
/// - signal relay, child spawn, and the supervisor loop
///
/// Returns the exit code the process should terminate with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_and_validate(args.config.as_deref(), args.overrides())?;
    debug!(?cfg, "effective configuration");

    let stdout_log = SyslogWriter::connect(
        &cfg.socket_paths,
        cfg.facility,
        cfg.stdout_level,
        &cfg.tag,
    )
    .await?;
    let stderr_log = SyslogWriter::connect(
        &cfg.socket_paths,
        cfg.facility,
        cfg.stderr_level,
        &cfg.tag,
    )
    .await?;

    let sinks = SinkPair {
        stdout: Arc::new(stdout_log),
        stderr: Arc::new(stderr_log),
    };

    supervise::supervise(&args.command, sinks, &cfg).await
}
