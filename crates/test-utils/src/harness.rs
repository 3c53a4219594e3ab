use std::sync::Arc;
use std::time::Duration;

use logexec::sink::SharedSink;
use logexec::supervise::{
    ChildResult, CoreSupervisor, EventSources, StreamFailure, Supervisor,
};
use nix::sys::signal::Signal;
use tokio::sync::{mpsc, oneshot};

use crate::fake_child::FakeChild;
use crate::sinks::MemorySink;

/// The sending halves of every supervisor event source, so a test can play
/// the part of the signal relay, the wait task and the forwarders.
pub struct EventDriver {
    pub signals: mpsc::Sender<Signal>,
    pub child_exit: Option<oneshot::Sender<ChildResult>>,
    pub streams_done: Option<oneshot::Sender<()>>,
    pub stream_failures: mpsc::UnboundedSender<StreamFailure>,
}

impl EventDriver {
    pub async fn signal(&self, sig: Signal) {
        self.signals.send(sig).await.expect("supervisor dropped signal channel");
    }

    pub fn child_exit(&mut self, result: ChildResult) {
        if let Some(tx) = self.child_exit.take() {
            let _ = tx.send(result);
        }
    }

    pub fn streams_done(&mut self) {
        if let Some(tx) = self.streams_done.take() {
            let _ = tx.send(());
        }
    }

    pub fn stream_failure(&self, failure: StreamFailure) {
        let _ = self.stream_failures.send(failure);
    }
}

/// A supervisor wired to a `FakeChild` and an in-memory diagnostics sink.
pub struct SupervisorHarness {
    pub supervisor: Supervisor<FakeChild>,
    pub driver: EventDriver,
    pub child: FakeChild,
    pub diagnostics: MemorySink,
}

impl SupervisorHarness {
    pub fn new(ignore_signals: bool, eof_grace: Duration) -> Self {
        let (signal_tx, signal_rx) = mpsc::channel(8);
        let (exit_tx, exit_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();
        let (failure_tx, failure_rx) = mpsc::unbounded_channel();

        let child = FakeChild::new();
        let diagnostics = MemorySink::new();
        let sink: SharedSink = Arc::new(diagnostics.clone());

        let supervisor = Supervisor::new(
            CoreSupervisor::new(ignore_signals),
            EventSources {
                signals: signal_rx,
                child_exit: exit_rx,
                streams_done: done_rx,
                stream_failures: failure_rx,
            },
            child.clone(),
            sink,
            eof_grace,
        );

        Self {
            supervisor,
            driver: EventDriver {
                signals: signal_tx,
                child_exit: Some(exit_tx),
                streams_done: Some(done_tx),
                stream_failures: failure_tx,
            },
            child,
            diagnostics,
        }
    }
}
