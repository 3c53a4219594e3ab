// src/supervise/mod.rs

//! Supervision of a single child process.
//!
//! This module ties together:
//! - line splitting and bounding (`line`, `splitter`)
//! - the two stream forwarders (`forwarder`)
//! - exit code resolution (`exit_status`)
//! - the coordinator, which reacts to:
//!   - OS signals
//!   - the child exiting
//!   - both forwarders finishing
//!   - a forwarder failing
//!
//! The pure coordinator state machine lives in [`core`]; the async/IO shell
//! is implemented in [`runtime`]. [`launch`] wires a spawned child into a
//! ready-to-run [`Supervisor`].

use std::fmt;

use nix::sys::signal::Signal;

use crate::errors::StreamError;

pub use exit_status::ChildResult;

/// Which of the child's output streams a forwarder drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// Terminal report of one forwarder.
#[derive(Debug)]
pub struct StreamFailure {
    pub stream: StreamKind,
    pub error: StreamError,
}

/// Everything the coordinator reacts to.
#[derive(Debug)]
pub enum SupervisorEvent {
    /// A relayed OS signal arrived.
    Signal(Signal),
    /// Both stream forwarders have exited.
    StreamsDone,
    /// The child process was reaped.
    ChildExited(ChildResult),
    /// A forwarder stopped with an error.
    StreamFailed(StreamFailure),
    /// The grace window opened by a premature EOF ran out.
    EofGraceElapsed,
}

/// Coarse lifecycle of a supervised run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Running,
    ChildExited,
    StreamsDone,
    Terminated,
}

pub mod core;
pub mod exit_status;
pub mod forwarder;
pub mod launch;
pub mod line;
pub mod runtime;
pub mod splitter;

pub use self::core::{CoreSupervisor, SupervisorCommand, SupervisorStep};
pub use exit_status::exit_code;
pub use forwarder::{spawn_completion_watch, spawn_forwarder, StreamForwarder};
pub use launch::{launch, supervise};
pub use line::BoundedLine;
pub use runtime::{EventSources, Supervisor};
pub use splitter::LineSplitter;
