// src/exec/spawn.rs

use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::info;

use crate::errors::{LogexecError, Result};

/// A started child with both output pipes taken.
#[derive(Debug)]
pub struct SpawnedChild {
    pub child: Child,
    pub pid: u32,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Start `command[0]` with the remaining elements as arguments.
///
/// stdin is inherited verbatim; stdout and stderr are piped.
pub fn spawn_command(command: &[String]) -> Result<SpawnedChild> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| LogexecError::ConfigError("No command provided".to_string()))?;

    info!(%program, ?args, "starting command");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| LogexecError::SpawnError {
            command: program.clone(),
            source,
        })?;

    let pid = child.id().ok_or_else(|| {
        LogexecError::StartupError(format!("process for '{program}' exited before it was tracked"))
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| LogexecError::StartupError("Error initializing stdout pipe".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| LogexecError::StartupError("Error initializing stderr pipe".to_string()))?;

    Ok(SpawnedChild {
        child,
        pid,
        stdout,
        stderr,
    })
}
