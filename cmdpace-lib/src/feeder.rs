//! Input feeder: turns a byte stream into a channel of argument lines.
//!
//! The reader runs in its own task so slow downstream processing never
//! stalls the OS-level read loop, but the channel it feeds holds a single
//! line, so the producer blocks until the consumer takes the previous one,
//! which is the intended back-pressure.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Spawn a producer task reading lines from `reader`.
///
/// Each line is emitted with its terminator stripped; an empty trailing
/// record is never produced. The channel closes on end-of-stream. A read
/// error other than end-of-stream is logged and then treated the same way:
/// no further input is fed.
pub(crate) fn spawn_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        let mut fed = 0usize;

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    // send blocks until the consumer takes the line; a closed
                    // channel means the consumer gave up (run failed)
                    if tx.send(line).await.is_err() {
                        debug!(target: "cmdpace::feeder", fed, "consumer gone, stopping");
                        return;
                    }
                    fed += 1;
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(target: "cmdpace::feeder", %err, "read error, treating as end of input");
                    break;
                }
            }
        }

        debug!(target: "cmdpace::feeder", fed, "input exhausted");
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    async fn collect(input: &str) -> Vec<String> {
        let mut rx = spawn_reader(Cursor::new(input.as_bytes().to_vec()));
        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_terminators_are_stripped() {
        assert_eq!(collect("a\nb\nc\n").await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_missing_trailing_newline_still_emits_last_line() {
        assert_eq!(collect("a\nb").await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_no_empty_trailing_record() {
        // A final terminator must not produce a fourth, empty line
        let lines = collect("a\nb\nc\n").await;
        assert_eq!(lines.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_input_closes_immediately() {
        assert!(collect("").await.is_empty());
    }

    #[tokio::test]
    async fn test_interior_empty_lines_are_preserved() {
        assert_eq!(collect("a\n\nb\n").await, vec!["a", "", "b"]);
    }

    #[tokio::test]
    async fn test_crlf_terminator_is_stripped() {
        assert_eq!(collect("a\r\nb\r\n").await, vec!["a", "b"]);
    }
}
