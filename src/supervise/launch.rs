// src/supervise/launch.rs

use nix::sys::signal::Signal;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::SupervisorConfig;
use crate::errors::{LogexecError, Result};
use crate::exec::{spawn_command, spawn_signal_relay, spawn_wait, ProcessHandle, SpawnedChild};
use crate::sink::SinkPair;

use super::core::CoreSupervisor;
use super::forwarder::{spawn_completion_watch, spawn_forwarder, StreamForwarder};
use super::runtime::{EventSources, Supervisor};
use super::splitter::LineSplitter;
use super::StreamKind;

/// Wire a freshly spawned child into a ready-to-run [`Supervisor`].
///
/// This starts:
/// - one forwarder task per output stream
/// - the task that reports when both forwarders are gone
/// - the child-wait task
///
/// The child's pid is shared between the wait task and the coordinator's
/// [`ProcessHandle`], so no signal is sent once the child has been reaped.
pub fn launch(
    spawned: SpawnedChild,
    sinks: SinkPair,
    cfg: &SupervisorConfig,
    signals: mpsc::Receiver<Signal>,
) -> Result<Supervisor<ProcessHandle>> {
    let SpawnedChild {
        child,
        pid,
        stdout,
        stderr,
    } = spawned;

    let handle = ProcessHandle::new(pid).map_err(|e| {
        LogexecError::StartupError(format!("cannot track child process: {e}"))
    })?;

    let (failure_tx, failure_rx) = mpsc::unbounded_channel();

    let stdout_task = spawn_forwarder(
        StreamForwarder::new(
            StreamKind::Stdout,
            LineSplitter::new(stdout, cfg.max_line),
            sinks.stdout.clone(),
        ),
        failure_tx.clone(),
    );
    let stderr_task = spawn_forwarder(
        StreamForwarder::new(
            StreamKind::Stderr,
            LineSplitter::new(stderr, cfg.max_line),
            sinks.stderr.clone(),
        ),
        failure_tx,
    );

    let streams_done = spawn_completion_watch(vec![stdout_task, stderr_task]);
    let child_exit = spawn_wait(child, handle.clone());

    let sources = EventSources {
        signals,
        child_exit,
        streams_done,
        stream_failures: failure_rx,
    };

    Ok(Supervisor::new(
        CoreSupervisor::new(cfg.ignore_signals),
        sources,
        handle,
        sinks.stderr,
        cfg.eof_grace,
    ))
}

/// Run `command` under supervision until it (and its output) is done.
///
/// Returns the exit code this process should terminate with.
pub async fn supervise(
    command: &[String],
    sinks: SinkPair,
    cfg: &SupervisorConfig,
) -> Result<i32> {
    // Handlers go in before the child starts.
    let signals = spawn_signal_relay()?;
    let spawned = spawn_command(command)?;
    info!(pid = spawned.pid, max_line = cfg.max_line, "child started");

    launch(spawned, sinks, cfg, signals)?.run().await
}
