// tests/syslog_writer.rs

use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, TimeZone};
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{UnixDatagram, UnixListener};

use logexec::errors::LogexecError;
use logexec::sink::syslog::SocketKind;
use logexec::sink::{LineSink, SyslogWriter};
use logexec::types::{Facility, Severity};
use logexec_test_utils::with_timeout;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn datagram_message_has_priority_tag_and_pid() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("log.sock");
    let server = UnixDatagram::bind(&path)?;

    let writer = SyslogWriter::connect(
        &[path.clone()],
        Facility::Local0,
        Severity::Info,
        "mytag",
    )
    .await?;
    assert_eq!(writer.kind(), SocketKind::Datagram);
    assert_eq!(writer.priority(), 134);

    writer.write_line(b"hello world").await?;

    let mut buf = vec![0u8; 1024];
    let n = server.recv(&mut buf).await?;
    let msg = String::from_utf8_lossy(&buf[..n]).into_owned();

    assert!(msg.starts_with("<134>"), "unexpected message: {msg:?}");
    let expected_suffix = format!(" mytag[{}]: hello world\n", std::process::id());
    assert!(msg.ends_with(&expected_suffix), "unexpected message: {msg:?}");
    Ok(())
}

#[tokio::test]
async fn falls_back_to_stream_socket() -> TestResult {
    let dir = TempDir::new()?;
    let missing = dir.path().join("missing.sock");
    let path = dir.path().join("stream.sock");
    let listener = UnixListener::bind(&path)?;

    let writer = SyslogWriter::connect(
        &[missing, path.clone()],
        Facility::Daemon,
        Severity::Warning,
        "svc",
    )
    .await?;
    assert_eq!(writer.kind(), SocketKind::Stream);
    assert_eq!(writer.path(), path.as_path());

    let (conn, _) = listener.accept().await?;
    writer.write_line(b"first").await?;
    writer.write_line(b"second").await?;

    let mut lines = BufReader::new(conn).lines();
    let first = lines.next_line().await?.unwrap_or_default();
    let second = lines.next_line().await?.unwrap_or_default();

    // daemon (3) * 8 + warning (4)
    assert!(first.starts_with("<28>"));
    assert!(first.contains(" svc["));
    assert!(first.ends_with(": first"));
    assert!(second.ends_with(": second"));
    Ok(())
}

#[tokio::test]
async fn no_reachable_socket_is_an_error() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = vec![dir.path().join("a.sock"), dir.path().join("b.sock")];

    let result = SyslogWriter::connect(&paths, Facility::Local0, Severity::Info, "x").await;

    assert!(matches!(result, Err(LogexecError::SyslogError(_))));
}

#[tokio::test]
async fn timestamp_uses_traditional_syslog_format() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("log.sock");
    let _server = UnixDatagram::bind(&path)?;

    let writer =
        SyslogWriter::connect(&[path], Facility::User, Severity::Notice, "fmt").await?;

    let when = Local
        .with_ymd_and_hms(2024, 3, 5, 7, 8, 9)
        .single()
        .ok_or("ambiguous local time")?;
    let msg = writer.format_message(b"payload", when);

    let expected = format!("<13>Mar  5 07:08:09 fmt[{}]: payload\n", std::process::id());
    assert_eq!(String::from_utf8(msg)?, expected);
    Ok(())
}

#[tokio::test]
async fn stream_writer_reconnects_after_peer_closes() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("stream.sock");
    let listener = UnixListener::bind(&path)?;

    let writer =
        SyslogWriter::connect(&[path.clone()], Facility::Local1, Severity::Info, "re").await?;
    assert_eq!(writer.kind(), SocketKind::Stream);

    // syslogd goes away and comes back on the same path.
    let (first_conn, _) = listener.accept().await?;
    drop(first_conn);
    drop(listener);
    std::fs::remove_file(&path)?;
    let listener = UnixListener::bind(&path)?;

    with_timeout(writer.write_line(b"after restart")).await?;

    let (conn, _) = with_timeout(listener.accept()).await?;
    let mut lines = BufReader::new(conn).lines();
    let line = with_timeout(lines.next_line()).await?.unwrap_or_default();

    assert!(line.ends_with(": after restart"), "unexpected message: {line:?}");
    Ok(())
}
