// src/supervise/exit_status.rs

//! Map the child's wait outcome to our own exit code.

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use tracing::warn;

/// Exit code used whenever the real one cannot be determined.
pub const FALLBACK_EXIT_CODE: i32 = 1;

/// Outcome of waiting on the child process.
pub type ChildResult = io::Result<ExitStatus>;

/// Resolve the exit code to propagate for a finished child.
///
/// - clean exit → 0
/// - exit with a code → that code
/// - killed by a signal → 1
/// - waiting itself failed → 1
pub fn exit_code(result: &ChildResult) -> i32 {
    match result {
        Ok(status) if status.success() => 0,
        Ok(status) => match status.code() {
            Some(code) => code,
            None => {
                warn!(
                    signal = ?status.signal(),
                    "child has no exit code (terminated by signal?); using fallback"
                );
                FALLBACK_EXIT_CODE
            }
        },
        Err(e) => {
            warn!(error = %e, "waiting for child failed; using fallback exit code");
            FALLBACK_EXIT_CODE
        }
    }
}
