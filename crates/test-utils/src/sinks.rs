use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use logexec::sink::{LineSink, SinkPair};

/// A sink that records every line it is given.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded lines, lossily decoded for easy assertions.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|l| String::from_utf8_lossy(l).into_owned())
            .collect()
    }

    pub fn raw_lines(&self) -> Vec<Vec<u8>> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineSink for MemorySink {
    fn write_line<'a>(
        &'a self,
        line: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + 'a>> {
        let lines = Arc::clone(&self.lines);
        Box::pin(async move {
            lines.lock().unwrap().push(line.to_vec());
            Ok(())
        })
    }
}

/// A sink whose every write fails with the given error kind.
#[derive(Debug, Clone)]
pub struct FailingSink {
    kind: io::ErrorKind,
    raw_os_error: Option<i32>,
}

impl FailingSink {
    pub fn new(kind: io::ErrorKind) -> Self {
        Self {
            kind,
            raw_os_error: None,
        }
    }

    /// Fail with a specific OS error number (e.g. `EBADF`).
    pub fn with_os_error(code: i32) -> Self {
        Self {
            kind: io::ErrorKind::Other,
            raw_os_error: Some(code),
        }
    }
}

impl LineSink for FailingSink {
    fn write_line<'a>(
        &'a self,
        _line: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + 'a>> {
        let err = match self.raw_os_error {
            Some(code) => io::Error::from_raw_os_error(code),
            None => io::Error::new(self.kind, "sink write failed"),
        };
        Box::pin(async move { Err(err) })
    }
}

/// Two fresh memory sinks plus the `SinkPair` that writes into them.
pub fn memory_sinks() -> (MemorySink, MemorySink, SinkPair) {
    let stdout = MemorySink::new();
    let stderr = MemorySink::new();
    let pair = SinkPair {
        stdout: Arc::new(stdout.clone()),
        stderr: Arc::new(stderr.clone()),
    };
    (stdout, stderr, pair)
}
