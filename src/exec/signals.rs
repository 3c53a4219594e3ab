// src/exec/signals.rs

//! Signal interception for passthrough to the child.

use std::io;

use nix::sys::signal::Signal;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::debug;

/// Signals intercepted and (unless ignored) passed on to the child.
pub const RELAYED_SIGNALS: [Signal; 4] = [
    Signal::SIGHUP,
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTERM,
];

/// Install handlers for [`RELAYED_SIGNALS`] and merge them into one channel.
///
/// Must be called before the child is started so that no signal slips
/// through to the default handler (which would kill us, not the child).
pub fn spawn_signal_relay() -> io::Result<mpsc::Receiver<Signal>> {
    let (tx, rx) = mpsc::channel(RELAYED_SIGNALS.len());

    for sig in RELAYED_SIGNALS {
        let mut stream = signal(SignalKind::from_raw(sig as i32))?;
        let tx = tx.clone();

        tokio::spawn(async move {
            while stream.recv().await.is_some() {
                debug!(signal = %sig, "signal received");
                if tx.send(sig).await.is_err() {
                    break;
                }
            }
        });
    }

    Ok(rx)
}
