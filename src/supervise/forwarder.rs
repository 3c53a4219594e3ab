// src/supervise/forwarder.rs

//! Stream forwarders: drain one child stream into one sink.

use tokio::io::AsyncRead;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::errors::StreamError;
use crate::sink::SharedSink;
use crate::supervise::splitter::LineSplitter;
use crate::supervise::{StreamFailure, StreamKind};

pub struct StreamForwarder<R> {
    stream: StreamKind,
    splitter: LineSplitter<R>,
    sink: SharedSink,
}

impl<R: AsyncRead + Unpin> StreamForwarder<R> {
    pub fn new(stream: StreamKind, splitter: LineSplitter<R>, sink: SharedSink) -> Self {
        Self {
            stream,
            splitter,
            sink,
        }
    }

    /// Forward lines until something fails.
    ///
    /// There is no clean exit: when the child closes its end of the pipe the
    /// splitter reports a premature EOF, and that is what comes back here.
    pub async fn run(mut self) -> StreamError {
        loop {
            let line = match self.splitter.next().await {
                Ok(line) => line,
                Err(e) => return e,
            };

            trace!(stream = %self.stream, %line, "forwarding line");

            if let Err(e) = self.sink.write_line(line.as_bytes()).await {
                return StreamError::Write(e);
            }
        }
    }
}

/// Run a forwarder as its own task.
///
/// The task reports its terminal condition exactly once on `failures` and
/// then exits.
pub fn spawn_forwarder<R>(
    forwarder: StreamForwarder<R>,
    failures: mpsc::UnboundedSender<StreamFailure>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let stream = forwarder.stream;
        let error = forwarder.run().await;
        debug!(%stream, error = %error, "stream forwarder stopped");

        // The coordinator may already be gone on a fatal path.
        let _ = failures.send(StreamFailure { stream, error });
    })
}

/// Fire a single notification once every forwarder task has exited.
pub fn spawn_completion_watch(handles: Vec<JoinHandle<()>>) -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        for handle in handles {
            // A panicking forwarder still counts as finished.
            if let Err(e) = handle.await {
                debug!(error = %e, "stream forwarder task did not finish cleanly");
            }
        }
        let _ = tx.send(());
    });

    rx
}
