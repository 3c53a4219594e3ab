// src/supervise/runtime.rs

use std::fmt;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use nix::sys::signal::Signal;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, Sleep};
use tracing::{debug, info, warn};

use crate::errors::{LogexecError, Result};
use crate::exec::ChildControl;
use crate::sink::SharedSink;

use super::core::{CoreSupervisor, SupervisorCommand};
use super::{ChildResult, StreamFailure, SupervisorEvent};

/// Channels feeding the coordinator.
pub struct EventSources {
    pub signals: mpsc::Receiver<Signal>,
    pub child_exit: oneshot::Receiver<ChildResult>,
    pub streams_done: oneshot::Receiver<()>,
    pub stream_failures: mpsc::UnboundedReceiver<StreamFailure>,
}

/// Waits on every event source at once and feeds the results into the
/// `CoreSupervisor`.
///
/// This is a pure IO shell: all decisions are made by the core. This struct
/// handles async IO: receiving events, delivering signals to the child and
/// writing diagnostics to the stderr sink.
pub struct Supervisor<C: ChildControl> {
    core: CoreSupervisor,
    sources: EventSources,
    child: C,
    diagnostics: SharedSink,
    eof_grace: Duration,
}

impl<C: ChildControl> fmt::Debug for Supervisor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("core", &self.core)
            .field("eof_grace", &self.eof_grace)
            .finish_non_exhaustive()
    }
}

impl<C: ChildControl> Supervisor<C> {
    pub fn new(
        core: CoreSupervisor,
        sources: EventSources,
        child: C,
        diagnostics: SharedSink,
        eof_grace: Duration,
    ) -> Self {
        Self {
            core,
            sources,
            child,
            diagnostics,
            eof_grace,
        }
    }

    /// Main event loop.
    ///
    /// Returns the exit code to terminate with. The one-shot sources (child
    /// exit, forwarders done, grace timer) are dropped from the wait as soon
    /// as they resolve.
    pub async fn run(self) -> Result<i32> {
        let Supervisor {
            mut core,
            sources,
            child,
            diagnostics,
            eof_grace,
        } = self;
        let EventSources {
            mut signals,
            child_exit,
            streams_done,
            mut stream_failures,
        } = sources;

        let mut child_exit = Some(child_exit);
        let mut streams_done = Some(streams_done);
        let mut grace: Option<Pin<Box<Sleep>>> = None;
        let mut signals_open = true;
        let mut failures_open = true;

        info!("logexec supervisor started");

        loop {
            // Stream failures are polled before `streams_done`: a forwarder
            // reports its failure before its task ends, so any failure is
            // seen before the completion it contributes to.
            let event = tokio::select! {
                biased;

                sig = signals.recv(), if signals_open => match sig {
                    Some(sig) => SupervisorEvent::Signal(sig),
                    None => {
                        signals_open = false;
                        continue;
                    }
                },

                failure = stream_failures.recv(), if failures_open => match failure {
                    Some(failure) => SupervisorEvent::StreamFailed(failure),
                    None => {
                        failures_open = false;
                        continue;
                    }
                },

                result = recv_once(&mut child_exit), if child_exit.is_some() => {
                    child_exit = None;
                    SupervisorEvent::ChildExited(result.unwrap_or_else(|_| {
                        Err(io::Error::other("child wait task ended without a result"))
                    }))
                }

                _ = tick(&mut grace), if grace.is_some() => {
                    grace = None;
                    SupervisorEvent::EofGraceElapsed
                }

                _ = recv_once(&mut streams_done), if streams_done.is_some() => {
                    streams_done = None;
                    SupervisorEvent::StreamsDone
                }

                else => {
                    return Err(LogexecError::Other(anyhow::anyhow!(
                        "all supervisor event sources closed before the child was resolved"
                    )));
                }
            };

            debug!(?event, "supervisor received event");

            let step = core.step(event);

            for command in step.commands {
                match command {
                    SupervisorCommand::ForwardSignal(sig) => {
                        if let Err(e) = child.signal(sig) {
                            warn!(signal = %sig, error = %e, "failed to pass signal to child");
                        }
                    }
                    SupervisorCommand::KillChild => {
                        if let Err(e) = child.kill() {
                            warn!(error = %e, "failed to kill child");
                        }
                    }
                    SupervisorCommand::WriteDiagnostic(msg) => {
                        if let Err(e) = diagnostics.write_line(msg.as_bytes()).await {
                            warn!(error = %e, %msg, "failed to write diagnostic to stderr log");
                        }
                    }
                    SupervisorCommand::StartEofGrace => {
                        grace = Some(Box::pin(sleep(eof_grace)));
                    }
                    SupervisorCommand::CancelEofGrace => {
                        grace = None;
                    }
                    SupervisorCommand::Exit(code) => {
                        info!(exit_code = code, "supervisor exiting");
                    }
                }
            }

            if !step.keep_running {
                break;
            }
        }

        core.exit_code().ok_or_else(|| {
            LogexecError::Other(anyhow::anyhow!("supervisor stopped without an exit code"))
        })
    }
}

/// Await a one-shot receiver that may already have been consumed.
///
/// Only polled while the slot is `Some` (guarded by the `select!`
/// precondition), so the pending arm never wins.
async fn recv_once<T>(
    slot: &mut Option<oneshot::Receiver<T>>,
) -> std::result::Result<T, oneshot::error::RecvError> {
    match slot {
        Some(rx) => rx.await,
        None => std::future::pending().await,
    }
}

async fn tick(slot: &mut Option<Pin<Box<Sleep>>>) {
    match slot {
        Some(timer) => timer.as_mut().await,
        None => std::future::pending().await,
    }
}
