// src/exec/child.rs

//! Child process control.
//!
//! The coordinator talks to a [`ChildControl`] instead of a raw process
//! handle. The child itself is owned by the wait task (see [`spawn_wait`]);
//! the coordinator only needs its pid to deliver signals.
//!
//! - [`ProcessHandle`] is the production implementation, built on `nix`.
//! - Tests can provide their own `ChildControl` that records what was sent.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::Child;
use tokio::sync::oneshot;
use tracing::debug;

use crate::supervise::ChildResult;

/// Operations the coordinator performs on the running child.
pub trait ChildControl: Send {
    /// Deliver `sig` to the child unchanged.
    fn signal(&self, sig: Signal) -> io::Result<()>;

    /// Forcibly kill the child.
    fn kill(&self) -> io::Result<()> {
        self.signal(Signal::SIGKILL)
    }
}

/// Signals a real child process by pid.
///
/// Clones share one pid slot. The wait task clears it (via
/// [`ProcessHandle::mark_reaped`]) as soon as the child has been reaped, after
/// which every signal is dropped: the pid may already belong to another
/// process.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    pid: Arc<Mutex<Option<Pid>>>,
}

impl ProcessHandle {
    pub fn new(pid: u32) -> io::Result<Self> {
        let raw = i32::try_from(pid).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("pid {pid} out of range"))
        })?;
        Ok(Self {
            pid: Arc::new(Mutex::new(Some(Pid::from_raw(raw)))),
        })
    }

    /// Forget the pid; the child is gone.
    pub fn mark_reaped(&self) {
        *self.slot() = None;
    }

    pub fn is_reaped(&self) -> bool {
        self.slot().is_none()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Pid>> {
        self.pid.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChildControl for ProcessHandle {
    fn signal(&self, sig: Signal) -> io::Result<()> {
        // Held across `kill` so the slot cannot be cleared halfway.
        let slot = self.slot();
        match *slot {
            Some(pid) => {
                debug!(%pid, signal = %sig, "signalling child");
                kill(pid, sig).map_err(io::Error::from)
            }
            None => {
                debug!(signal = %sig, "child already reaped; not signalling");
                Ok(())
            }
        }
    }
}

/// Wait for the child in its own task and report the result once.
///
/// `handle` is marked reaped before the result is sent, so the coordinator
/// never sees the exit while the pid is still considered live.
pub fn spawn_wait(mut child: Child, handle: ProcessHandle) -> oneshot::Receiver<ChildResult> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = child.wait().await;
        handle.mark_reaped();
        debug!(?result, "child wait finished");
        let _ = tx.send(result);
    });

    rx
}
