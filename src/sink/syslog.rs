// src/sink/syslog.rs

//! Minimal local syslog writer.
//!
//! Messages use the traditional local format understood by syslogd,
//! rsyslog and journald's syslog socket:
//!
//! ```text
//! <PRI>Mmm dd hh:mm:ss TAG[PID]: MESSAGE\n
//! ```
//!
//! Connection tries every configured socket path as a datagram socket first,
//! then every path as a stream socket, and keeps the first that works.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::{DateTime, Local};
use tokio::io::AsyncWriteExt;
use tokio::net::{UnixDatagram, UnixStream};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::{LogexecError, Result};
use crate::sink::LineSink;
use crate::types::{priority, Facility, Severity};

/// Socket flavour used for a syslog connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    Datagram,
    Stream,
}

impl fmt::Display for SocketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketKind::Datagram => f.write_str("unixgram"),
            SocketKind::Stream => f.write_str("unix"),
        }
    }
}

enum Transport {
    Datagram(UnixDatagram),
    Stream(UnixStream),
}

impl Transport {
    async fn open(kind: SocketKind, path: &Path) -> io::Result<Self> {
        match kind {
            SocketKind::Datagram => {
                let sock = UnixDatagram::unbound()?;
                sock.connect(path)?;
                Ok(Transport::Datagram(sock))
            }
            SocketKind::Stream => Ok(Transport::Stream(UnixStream::connect(path).await?)),
        }
    }

    async fn send(&mut self, msg: &[u8]) -> io::Result<()> {
        match self {
            Transport::Datagram(sock) => {
                let n = sock.send(msg).await?;
                if n != msg.len() {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("short syslog datagram write ({n} of {} bytes)", msg.len()),
                    ));
                }
                Ok(())
            }
            Transport::Stream(sock) => sock.write_all(msg).await,
        }
    }
}

/// A syslog connection with a fixed priority and tag.
pub struct SyslogWriter {
    priority: u8,
    tag: String,
    pid: u32,
    kind: SocketKind,
    path: PathBuf,
    transport: Mutex<Transport>,
}

impl fmt::Debug for SyslogWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyslogWriter")
            .field("priority", &self.priority)
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SyslogWriter {
    /// Connect to the first reachable local syslog socket.
    pub async fn connect(
        paths: &[PathBuf],
        facility: Facility,
        severity: Severity,
        tag: &str,
    ) -> Result<Self> {
        for kind in [SocketKind::Datagram, SocketKind::Stream] {
            for path in paths {
                match Transport::open(kind, path).await {
                    Ok(transport) => {
                        debug!(
                            path = %path.display(),
                            kind = %kind,
                            %facility,
                            %severity,
                            "connected to syslog"
                        );
                        return Ok(Self {
                            priority: priority(facility, severity),
                            tag: tag.to_string(),
                            pid: std::process::id(),
                            kind,
                            path: path.clone(),
                            transport: Mutex::new(transport),
                        });
                    }
                    Err(e) => {
                        debug!(
                            path = %path.display(),
                            kind = %kind,
                            error = %e,
                            "syslog socket unavailable"
                        );
                    }
                }
            }
        }

        Err(LogexecError::SyslogError(format!(
            "Unix syslog delivery error: no usable socket among {:?}",
            paths
        )))
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> SocketKind {
        self.kind
    }

    /// Render one syslog message for `line` stamped with `now`.
    pub fn format_message(&self, line: &[u8], now: DateTime<Local>) -> Vec<u8> {
        let header = format!(
            "<{}>{} {}[{}]: ",
            self.priority,
            now.format("%b %e %H:%M:%S"),
            self.tag,
            self.pid
        );

        let mut msg = Vec::with_capacity(header.len() + line.len() + 1);
        msg.extend_from_slice(header.as_bytes());
        msg.extend_from_slice(line);
        if !line.ends_with(b"\n") {
            msg.push(b'\n');
        }
        msg
    }

    /// Send a message, reconnecting once if the socket went away (e.g.
    /// syslogd was restarted).
    async fn send(&self, msg: &[u8]) -> io::Result<()> {
        let mut transport = self.transport.lock().await;

        match transport.send(msg).await {
            Ok(()) => Ok(()),
            Err(first) => {
                warn!(
                    path = %self.path.display(),
                    error = %first,
                    "syslog write failed; reconnecting"
                );
                *transport = Transport::open(self.kind, &self.path).await?;
                transport.send(msg).await
            }
        }
    }
}

impl LineSink for SyslogWriter {
    fn write_line<'a>(
        &'a self,
        line: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let msg = self.format_message(line, Local::now());
            self.send(&msg).await
        })
    }
}
