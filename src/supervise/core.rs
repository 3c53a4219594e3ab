// src/supervise/core.rs

//! Pure coordinator state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`SupervisorEvent`]s and produces:
//! - an updated state
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`supervise::runtime::Supervisor`) is responsible for:
//! - waiting on signals, the child, and the forwarders
//! - signalling / killing the child
//! - writing diagnostics to the stderr sink
//!
//! The core has no channels, no Tokio types, and does not perform any IO, so
//! every branch can be tested directly.

use nix::sys::signal::Signal;
use tracing::{debug, error, info, warn};

use crate::supervise::exit_status::{exit_code, ChildResult, FALLBACK_EXIT_CODE};
use crate::supervise::{StreamFailure, SupervisorEvent, SupervisorState};

/// Command produced by the core, to be executed by the IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorCommand {
    /// Send this signal to the child unchanged.
    ForwardSignal(Signal),
    /// Forcibly kill the child.
    KillChild,
    /// Write a line to the stderr sink.
    WriteDiagnostic(String),
    /// Open the premature-EOF grace window.
    StartEofGrace,
    /// Close the grace window without judging the EOF.
    CancelEofGrace,
    /// Stop supervising and exit with this code.
    Exit(i32),
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorStep {
    pub commands: Vec<SupervisorCommand>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl SupervisorStep {
    fn running(commands: Vec<SupervisorCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn idle() -> Self {
        Self::running(Vec::new())
    }
}

#[derive(Debug)]
pub struct CoreSupervisor {
    ignore_signals: bool,
    child_exited: bool,
    streams_done: bool,
    eof_grace_pending: bool,
    exit_code: Option<i32>,
}

impl CoreSupervisor {
    pub fn new(ignore_signals: bool) -> Self {
        Self {
            ignore_signals,
            child_exited: false,
            streams_done: false,
            eof_grace_pending: false,
            exit_code: None,
        }
    }

    pub fn state(&self) -> SupervisorState {
        if self.exit_code.is_some() {
            SupervisorState::Terminated
        } else if self.child_exited {
            SupervisorState::ChildExited
        } else if self.streams_done {
            SupervisorState::StreamsDone
        } else {
            SupervisorState::Running
        }
    }

    /// Final exit code, once the core has decided to stop.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn eof_grace_pending(&self) -> bool {
        self.eof_grace_pending
    }

    /// Handle a single event, updating state and returning the resulting
    /// commands for the IO shell.
    pub fn step(&mut self, event: SupervisorEvent) -> SupervisorStep {
        if self.exit_code.is_some() {
            debug!(?event, "event after termination; ignoring");
            return SupervisorStep {
                commands: Vec::new(),
                keep_running: false,
            };
        }

        match event {
            SupervisorEvent::Signal(sig) => self.handle_signal(sig),
            SupervisorEvent::StreamsDone => self.handle_streams_done(),
            SupervisorEvent::ChildExited(result) => self.handle_child_exit(result),
            SupervisorEvent::StreamFailed(failure) => self.handle_stream_failure(failure),
            SupervisorEvent::EofGraceElapsed => self.handle_grace_elapsed(),
        }
    }

    fn handle_signal(&mut self, sig: Signal) -> SupervisorStep {
        if self.ignore_signals {
            info!(signal = %sig, "logexec caught signal, not passing through");
            return SupervisorStep::idle();
        }
        if self.child_exited {
            debug!(signal = %sig, "caught signal after child exited; dropping");
            return SupervisorStep::idle();
        }

        info!(signal = %sig, "logexec caught signal, passing through");
        SupervisorStep::running(vec![SupervisorCommand::ForwardSignal(sig)])
    }

    fn handle_streams_done(&mut self) -> SupervisorStep {
        debug!("all stream forwarders finished");
        self.streams_done = true;

        if self.child_exited {
            return self.finish(Vec::new(), 0);
        }
        SupervisorStep::idle()
    }

    fn handle_child_exit(&mut self, result: ChildResult) -> SupervisorStep {
        self.child_exited = true;
        let code = exit_code(&result);
        info!(exit_code = code, "child process exited");

        let mut commands = Vec::new();
        if self.eof_grace_pending {
            // The EOF we were holding was just the child going away.
            self.eof_grace_pending = false;
            commands.push(SupervisorCommand::CancelEofGrace);
        }

        if code != 0 {
            commands.push(SupervisorCommand::WriteDiagnostic(format!(
                "Command return non-zero exit status: {code}"
            )));
            return self.finish(commands, code);
        }

        if self.streams_done {
            return self.finish(commands, 0);
        }
        SupervisorStep::running(commands)
    }

    fn handle_stream_failure(&mut self, failure: StreamFailure) -> SupervisorStep {
        let StreamFailure { stream, error } = failure;

        if error.is_bad_descriptor() {
            debug!(%stream, error = %error, "stream already closed; ignoring");
            return SupervisorStep::idle();
        }

        if error.is_premature_eof() {
            if self.child_exited {
                debug!(%stream, "stream closed after child exit");
                return SupervisorStep::idle();
            }
            if self.eof_grace_pending {
                debug!(%stream, "stream closed; grace window already open");
                return SupervisorStep::idle();
            }
            debug!(%stream, "stream closed while child still running; waiting for exit");
            self.eof_grace_pending = true;
            return SupervisorStep::running(vec![SupervisorCommand::StartEofGrace]);
        }

        error!(%stream, error = %error, "Error logging command output");
        let mut commands = Vec::new();
        // Once reaped, the pid is no longer ours to kill.
        if !self.child_exited {
            commands.push(SupervisorCommand::KillChild);
        }
        commands.push(SupervisorCommand::WriteDiagnostic(format!(
            "Error logging command output: {error}"
        )));
        self.finish(commands, FALLBACK_EXIT_CODE)
    }

    fn handle_grace_elapsed(&mut self) -> SupervisorStep {
        if !self.eof_grace_pending {
            return SupervisorStep::idle();
        }
        self.eof_grace_pending = false;

        if self.child_exited {
            return SupervisorStep::idle();
        }

        warn!("output stream closed but child is still running; killing it");
        self.finish(vec![SupervisorCommand::KillChild], FALLBACK_EXIT_CODE)
    }

    fn finish(&mut self, mut commands: Vec<SupervisorCommand>, code: i32) -> SupervisorStep {
        self.exit_code = Some(code);
        commands.push(SupervisorCommand::Exit(code));
        SupervisorStep {
            commands,
            keep_running: false,
        }
    }
}
