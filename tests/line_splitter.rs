// tests/line_splitter.rs

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWriteExt, ReadBuf};

use logexec::errors::StreamError;
use logexec::supervise::splitter::Fragment;
use logexec::supervise::{BoundedLine, LineSplitter};

/// Drain a splitter until it reports an error, returning the lines seen and
/// the terminal error.
async fn drain<R: AsyncRead + Unpin>(
    splitter: &mut LineSplitter<R>,
) -> (Vec<String>, StreamError) {
    let mut lines = Vec::new();
    loop {
        match splitter.next().await {
            Ok(line) => lines.push(line.to_string()),
            Err(e) => return (lines, e),
        }
    }
}

struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "boom")))
    }
}

#[test]
fn bounded_line_keeps_short_input_trimmed() {
    let line = BoundedLine::bound(b"  hello world \t", 64);
    assert_eq!(line.as_bytes(), b"hello world");
}

#[test]
fn bounded_line_truncates_with_ellipsis() {
    let line = BoundedLine::bound(b"0123456789ABCDEF", 10);
    assert_eq!(line.as_bytes(), b"0123456...");
    assert_eq!(line.len(), 10);
}

#[test]
fn bounded_line_at_exact_cap_is_untouched() {
    let line = BoundedLine::bound(b"0123456789", 10);
    assert_eq!(line.as_bytes(), b"0123456789");
}

#[test]
fn buffer_is_twice_the_line_cap() {
    let splitter = LineSplitter::new(&b""[..], 8192);
    assert_eq!(splitter.buffer_size(), 16 * 1024);
}

#[test]
fn smallest_cap_still_gets_a_double_buffer() {
    let splitter = LineSplitter::new(&b""[..], 4);
    assert_eq!(splitter.buffer_size(), 8);
}

#[tokio::test]
async fn first_fragment_is_judged_after_trimming() {
    // Cap 4 → 8 byte buffer: the first fragment is all spaces.
    let mut splitter = LineSplitter::new(&b"        abcdefgh\nnext\n"[..], 4);
    let (lines, err) = drain(&mut splitter).await;

    assert_eq!(lines, vec!["", "next"]);
    assert!(err.is_premature_eof());
}

#[tokio::test]
async fn over_cap_line_is_truncated_to_cap() {
    let mut splitter = LineSplitter::new(&b"0123456789ABCDEF\n"[..], 10);

    let line = splitter.next().await.expect("one line");
    assert_eq!(line.as_bytes(), b"0123456...");

    assert!(matches!(splitter.next().await, Err(StreamError::PrematureEof)));
}

#[tokio::test]
async fn end_of_stream_is_premature_eof() {
    let mut splitter = LineSplitter::new(&b""[..], 64);
    let err = splitter.next().await.unwrap_err();
    assert!(err.is_premature_eof());
}

#[tokio::test]
async fn crlf_endings_and_whitespace_are_stripped() {
    let mut splitter = LineSplitter::new(&b"one\r\n  two  \r\n\tthree\n"[..], 64);
    let (lines, err) = drain(&mut splitter).await;

    assert_eq!(lines, vec!["one", "two", "three"]);
    assert!(err.is_premature_eof());
}

#[tokio::test]
async fn final_line_without_newline_is_emitted_before_eof() {
    let mut splitter = LineSplitter::new(&b"first\nlast words"[..], 64);
    let (lines, err) = drain(&mut splitter).await;

    assert_eq!(lines, vec!["first", "last words"]);
    assert!(err.is_premature_eof());
}

#[tokio::test]
async fn blank_lines_are_emitted_as_empty() {
    let mut splitter = LineSplitter::new(&b"a\n\n   \nb\n"[..], 64);
    let (lines, _) = drain(&mut splitter).await;

    assert_eq!(lines, vec!["a", "", "", "b"]);
}

#[tokio::test]
async fn long_line_emits_only_its_first_fragment() {
    // Cap 8 → 16 byte buffer; a 40 byte line arrives as 16 + 16 + 8.
    let mut input = vec![b'A'; 40];
    input.extend_from_slice(b"\nshort\n");

    let mut splitter = LineSplitter::new(&input[..], 8);
    let (lines, err) = drain(&mut splitter).await;

    assert_eq!(lines, vec!["AAAAA...", "short"]);
    assert!(err.is_premature_eof());
}

#[tokio::test]
async fn crlf_split_at_buffer_boundary_is_recognised() {
    let mut input = vec![b'x'; 15];
    input.extend_from_slice(b"\r\ny\n");

    let mut splitter = LineSplitter::new(&input[..], 8);

    assert_eq!(
        splitter.read_fragment().await.unwrap(),
        Some(Fragment {
            bytes: vec![b'x'; 15],
            partial: true,
        })
    );
    assert_eq!(
        splitter.read_fragment().await.unwrap(),
        Some(Fragment {
            bytes: Vec::new(),
            partial: false,
        })
    );
    assert_eq!(
        splitter.read_fragment().await.unwrap(),
        Some(Fragment {
            bytes: b"y".to_vec(),
            partial: false,
        })
    );
    assert_eq!(splitter.read_fragment().await.unwrap(), None);
}

#[tokio::test]
async fn lines_split_across_reads_are_reassembled() {
    let (mut writer, reader) = tokio::io::duplex(64);

    let producer = tokio::spawn(async move {
        for chunk in [&b"hel"[..], b"lo\nwor", b"ld\n"] {
            writer.write_all(chunk).await.unwrap();
            writer.flush().await.unwrap();
            tokio::task::yield_now().await;
        }
        // Dropping the writer closes the stream.
    });

    let mut splitter = LineSplitter::new(reader, 64);
    let (lines, err) = drain(&mut splitter).await;
    producer.await.unwrap();

    assert_eq!(lines, vec!["hello", "world"]);
    assert!(err.is_premature_eof());
}

#[tokio::test]
async fn read_errors_are_propagated() {
    let mut splitter = LineSplitter::new(BrokenReader, 64);

    match splitter.next().await {
        Err(StreamError::Read(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("expected read error, got {other:?}"),
    }
}
