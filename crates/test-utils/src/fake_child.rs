use std::io;
use std::sync::{Arc, Mutex};

use logexec::exec::ChildControl;
use nix::sys::signal::Signal;
use tracing::debug;

/// A fake child that records which signals it was sent.
///
/// `kill()` goes through the default trait method, so it shows up as
/// `SIGKILL` in the recorded list.
#[derive(Debug, Default, Clone)]
pub struct FakeChild {
    received: Arc<Mutex<Vec<Signal>>>,
}

impl FakeChild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<Signal> {
        self.received.lock().unwrap().clone()
    }

    pub fn was_killed(&self) -> bool {
        self.received().contains(&Signal::SIGKILL)
    }
}

impl ChildControl for FakeChild {
    fn signal(&self, sig: Signal) -> io::Result<()> {
        debug!(signal = %sig, "fake child received signal");
        self.received.lock().unwrap().push(sig);
        Ok(())
    }
}
