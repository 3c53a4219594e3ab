// src/supervise/line.rs

use std::fmt;

/// Marker appended to lines cut at the length cap.
pub const ELLIPSIS: &[u8] = b"...";

/// A single trimmed, length-capped unit of log output.
///
/// Invariant: `len() <= max_line` for the cap it was built with.
#[derive(Clone, PartialEq, Eq)]
pub struct BoundedLine(Vec<u8>);

impl BoundedLine {
    /// Trim surrounding ASCII whitespace and cap the result at `max_line`
    /// bytes. Over-long lines keep their first `max_line - 3` bytes followed
    /// by `...`.
    pub fn bound(raw: &[u8], max_line: usize) -> Self {
        let trimmed = raw.trim_ascii();

        if trimmed.len() <= max_line {
            return BoundedLine(trimmed.to_vec());
        }

        let keep = max_line.saturating_sub(ELLIPSIS.len());
        let mut out = Vec::with_capacity(keep + ELLIPSIS.len());
        out.extend_from_slice(&trimmed[..keep]);
        out.extend_from_slice(ELLIPSIS);
        BoundedLine(out)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for BoundedLine {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for BoundedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundedLine({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for BoundedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
