// src/supervise/splitter.rs

//! Turns a raw byte stream into bounded log lines.
//!
//! The splitter keeps its own fixed-size buffer of `2 * max_line` bytes. A
//! line that does not fit is handed out in pieces ("partial fragments"); only
//! the first piece of such a line is emitted, the rest is dropped.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::validate::MIN_MAX_LINE;
use crate::errors::StreamError;
use crate::supervise::line::BoundedLine;

/// Lower bound on the internal buffer; matches `2 * max_line` for every
/// line cap that passes config validation.
const MIN_BUFFER_SIZE: usize = 2 * MIN_MAX_LINE;

/// One physical line as read from the stream, before trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub bytes: Vec<u8>,
    /// The buffer filled up before a newline was seen; more of this line
    /// follows.
    pub partial: bool,
}

pub struct LineSplitter<R> {
    reader: R,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    max_line: usize,
    last_was_partial: bool,
}

impl<R: AsyncRead + Unpin> LineSplitter<R> {
    pub fn new(reader: R, max_line: usize) -> Self {
        let size = max_line.saturating_mul(2).max(MIN_BUFFER_SIZE);
        Self {
            reader,
            buf: vec![0; size],
            start: 0,
            end: 0,
            max_line,
            last_was_partial: false,
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buf.len()
    }

    /// Next line to log.
    ///
    /// End of stream is reported as [`StreamError::PrematureEof`]: the pipe
    /// is only expected to close when the child goes away, and the
    /// coordinator decides whether that was expected.
    pub async fn next(&mut self) -> Result<BoundedLine, StreamError> {
        loop {
            let fragment = match self.read_fragment().await {
                Ok(Some(f)) => f,
                Ok(None) => return Err(StreamError::PrematureEof),
                Err(e) => return Err(StreamError::Read(e)),
            };

            match (fragment.partial, self.last_was_partial) {
                // First piece of a long line: emit it (it will be truncated).
                (true, false) => self.last_was_partial = true,
                // Middle piece.
                (true, true) => continue,
                // Last piece.
                (false, true) => {
                    self.last_was_partial = false;
                    continue;
                }
                (false, false) => {}
            }

            return Ok(BoundedLine::bound(&fragment.bytes, self.max_line));
        }
    }

    /// Read one physical line.
    ///
    /// Returns `Ok(None)` at end of stream once everything buffered has been
    /// handed out. A final line without a newline is returned as a complete
    /// fragment.
    pub async fn read_fragment(&mut self) -> io::Result<Option<Fragment>> {
        loop {
            let pending = &self.buf[self.start..self.end];

            if let Some(i) = pending.iter().position(|&b| b == b'\n') {
                let line = pending[..i].strip_suffix(b"\r").unwrap_or(&pending[..i]);
                let bytes = line.to_vec();
                self.start += i + 1;
                return Ok(Some(Fragment {
                    bytes,
                    partial: false,
                }));
            }

            if pending.len() == self.buf.len() {
                // Hold back a trailing '\r' in case its '\n' is next.
                let mut n = pending.len();
                if pending[n - 1] == b'\r' {
                    n -= 1;
                }
                let bytes = pending[..n].to_vec();
                self.start += n;
                return Ok(Some(Fragment {
                    bytes,
                    partial: true,
                }));
            }

            if self.start > 0 {
                self.buf.copy_within(self.start..self.end, 0);
                self.end -= self.start;
                self.start = 0;
            }

            let n = self.reader.read(&mut self.buf[self.end..]).await?;
            if n == 0 {
                if self.start == self.end {
                    return Ok(None);
                }
                let bytes = self.buf[self.start..self.end].to_vec();
                self.start = 0;
                self.end = 0;
                return Ok(Some(Fragment {
                    bytes,
                    partial: false,
                }));
            }
            self.end += n;
        }
    }
}
