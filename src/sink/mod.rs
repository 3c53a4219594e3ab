// src/sink/mod.rs

//! Line sinks: where finished log lines end up.
//!
//! The supervisor talks to a [`LineSink`] instead of a concrete syslog
//! connection. This keeps the forwarders and the coordinator independent of
//! the transport, and lets tests capture lines in memory.
//!
//! - [`syslog`] provides `SyslogWriter`, the production sink.

pub mod syslog;

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;

pub use syslog::SyslogWriter;

/// A destination for finished log lines.
///
/// Implementations must be shareable: the stderr sink is written to both by
/// its forwarder and by the coordinator (for diagnostics).
pub trait LineSink: Send + Sync {
    /// Write one line. `line` carries no trailing newline.
    fn write_line<'a>(
        &'a self,
        line: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + 'a>>;
}

pub type SharedSink = Arc<dyn LineSink>;

/// The pair of sinks for one supervised child.
#[derive(Clone)]
pub struct SinkPair {
    pub stdout: SharedSink,
    pub stderr: SharedSink,
}
