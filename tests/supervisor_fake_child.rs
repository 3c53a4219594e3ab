// tests/supervisor_fake_child.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::time::Duration;

use nix::sys::signal::Signal;
use tokio::time::timeout;

use logexec::errors::StreamError;
use logexec::supervise::{StreamFailure, StreamKind};
use logexec_test_utils::harness::SupervisorHarness;

type TestResult = Result<(), Box<dyn Error>>;

const GRACE: Duration = Duration::from_millis(50);

fn status(code: i32) -> ExitStatus {
    ExitStatus::from_raw(code << 8)
}

#[tokio::test]
async fn signal_is_forwarded_then_clean_exit() -> TestResult {
    init_tracing();

    let SupervisorHarness {
        supervisor,
        mut driver,
        child,
        diagnostics,
    } = SupervisorHarness::new(false, GRACE);

    let run = tokio::spawn(supervisor.run());

    driver.signal(Signal::SIGTERM).await;
    driver.child_exit(Ok(status(0)));
    driver.streams_done();

    let code = timeout(Duration::from_secs(3), run).await??;

    assert_eq!(code?, 0);
    assert_eq!(child.received(), vec![Signal::SIGTERM]);
    assert!(diagnostics.lines().is_empty());
    Ok(())
}

#[tokio::test]
async fn ignored_signals_never_reach_child() -> TestResult {
    init_tracing();

    let SupervisorHarness {
        supervisor,
        mut driver,
        child,
        ..
    } = SupervisorHarness::new(true, GRACE);

    let run = tokio::spawn(supervisor.run());

    driver.signal(Signal::SIGINT).await;
    driver.signal(Signal::SIGHUP).await;
    driver.streams_done();
    driver.child_exit(Ok(status(0)));

    let code = timeout(Duration::from_secs(3), run).await??;

    assert_eq!(code?, 0);
    assert!(child.received().is_empty());
    Ok(())
}

#[tokio::test]
async fn nonzero_exit_does_not_wait_for_streams() -> TestResult {
    init_tracing();

    let SupervisorHarness {
        supervisor,
        mut driver,
        diagnostics,
        ..
    } = SupervisorHarness::new(false, GRACE);

    let run = tokio::spawn(supervisor.run());

    // Streams never finish.
    driver.child_exit(Ok(status(7)));

    let code = timeout(Duration::from_secs(3), run).await??;

    assert_eq!(code?, 7);
    let lines = diagnostics.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("non-zero exit status"));
    Ok(())
}

#[tokio::test]
async fn stream_io_error_kills_child() -> TestResult {
    init_tracing();

    let SupervisorHarness {
        supervisor,
        driver,
        child,
        diagnostics,
    } = SupervisorHarness::new(false, GRACE);

    let run = tokio::spawn(supervisor.run());

    driver.stream_failure(StreamFailure {
        stream: StreamKind::Stdout,
        error: StreamError::Read(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
    });

    let code = timeout(Duration::from_secs(3), run).await??;

    assert_eq!(code?, 1);
    assert!(child.was_killed());
    let lines = diagnostics.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Error logging command output"));

    drop(driver);
    Ok(())
}

#[tokio::test]
async fn eof_while_child_keeps_running_kills_after_grace() -> TestResult {
    init_tracing();

    let SupervisorHarness {
        supervisor,
        driver,
        child,
        diagnostics,
    } = SupervisorHarness::new(false, GRACE);

    let run = tokio::spawn(supervisor.run());

    driver.stream_failure(StreamFailure {
        stream: StreamKind::Stderr,
        error: StreamError::PrematureEof,
    });

    let code = timeout(Duration::from_secs(3), run).await??;

    assert_eq!(code?, 1);
    assert!(child.was_killed());
    assert!(diagnostics.lines().is_empty());

    drop(driver);
    Ok(())
}

#[tokio::test]
async fn eof_followed_by_exit_is_clean() -> TestResult {
    init_tracing();

    let SupervisorHarness {
        supervisor,
        mut driver,
        child,
        diagnostics,
    } = SupervisorHarness::new(false, Duration::from_secs(5));

    let run = tokio::spawn(supervisor.run());

    for stream in [StreamKind::Stdout, StreamKind::Stderr] {
        driver.stream_failure(StreamFailure {
            stream,
            error: StreamError::PrematureEof,
        });
    }
    driver.child_exit(Ok(status(0)));
    driver.streams_done();

    let code = timeout(Duration::from_secs(3), run).await??;

    assert_eq!(code?, 0);
    assert!(!child.was_killed());
    assert!(diagnostics.lines().is_empty());
    Ok(())
}
