//! Demand-driven connection adapter over a duplex byte stream.
//!
//! Wraps a raw socket behind a sequential read/write interface. No data is
//! pulled from the transport until `read()` is awaited, and each call pulls
//! at most one chunk, so delivery stays in lock-step with the consumer.
//! `write()` resolves only once the transport has accepted every byte,
//! which is the explicit backpressure point: the caller issues no further
//! operations while a write is in flight.
//!
//! Terminal state is tracked exactly once per direction of failure:
//! a clean half-close latches the end-of-stream flag, a transport error
//! latches the error. Both are permanent; every later call observes the
//! same outcome.

use crate::error::ConnError;
use bytes::{Bytes, BytesMut};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest chunk pulled from the transport per read call.
const READ_CHUNK: usize = 16 * 1024;

/// Recorded terminal transport error.
///
/// `io::Error` is not `Clone`, so the kind and message are kept and an
/// equivalent error is rebuilt for every call made after the failure.
#[derive(Debug)]
struct TerminalError {
    kind: io::ErrorKind,
    message: String,
}

impl TerminalError {
    fn record(e: &io::Error) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }

    fn replay(&self) -> io::Error {
        io::Error::new(self.kind, self.message.clone())
    }
}

/// A single accepted duplex transport endpoint.
///
/// State machine: `ACTIVE` until the peer half-closes (`ENDED`) or the
/// transport fails (`ERRORED`). Both states are terminal and idempotent.
#[derive(Debug)]
pub struct Conn<S> {
    stream: S,
    /// Set once on transport failure, never cleared.
    terminal: Option<TerminalError>,
    /// Set once on peer half-close, never cleared.
    ended: bool,
    /// Guard for the one-outstanding-read invariant.
    read_in_flight: bool,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Conn<S> {
    /// Wrap an accepted transport endpoint.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            terminal: None,
            ended: false,
            read_in_flight: false,
        }
    }

    /// Pull the next chunk from the transport.
    ///
    /// Exactly one of three outcomes fires per call:
    /// - data arrived: returns the non-empty chunk;
    /// - the peer half-closed: returns an empty chunk, now and on every
    ///   later call;
    /// - the transport failed: returns `Transport`, now and on every later
    ///   call.
    ///
    /// At most one read may be outstanding; a second concurrent call is a
    /// caller bug and fails with `ProtocolViolation`.
    pub async fn read(&mut self) -> Result<Bytes, ConnError> {
        if self.read_in_flight {
            return Err(ConnError::ProtocolViolation("read already outstanding"));
        }
        if let Some(err) = &self.terminal {
            return Err(ConnError::Transport(err.replay()));
        }
        if self.ended {
            return Ok(Bytes::new());
        }

        self.read_in_flight = true;
        let mut chunk = BytesMut::with_capacity(READ_CHUNK);
        let result = self.stream.read_buf(&mut chunk).await;
        self.read_in_flight = false;

        match result {
            Ok(0) => {
                self.ended = true;
                Ok(Bytes::new())
            }
            Ok(_) => Ok(chunk.freeze()),
            Err(e) => {
                self.terminal = Some(TerminalError::record(&e));
                Err(ConnError::Transport(e))
            }
        }
    }

    /// Submit bytes to the transport, resolving once all are accepted.
    ///
    /// A zero-length payload is a caller bug (`ProtocolViolation`). After a
    /// transport failure every write fails with the recorded error.
    pub async fn write(&mut self, data: &[u8]) -> Result<(), ConnError> {
        if data.is_empty() {
            return Err(ConnError::ProtocolViolation("zero-length write"));
        }
        if let Some(err) = &self.terminal {
            return Err(ConnError::Transport(err.replay()));
        }

        match self.write_all_flush(data).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.terminal = Some(TerminalError::record(&e));
                Err(ConnError::Transport(e))
            }
        }
    }

    async fn write_all_flush(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data).await?;
        self.stream.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_read_delivers_chunk() {
        let mock = Builder::new().read(b"hello").build();
        let mut conn = Conn::new(mock);

        let chunk = conn.read().await.unwrap();
        assert_eq!(&chunk[..], b"hello");
    }

    #[tokio::test]
    async fn test_eof_is_empty_and_idempotent() {
        let mock = Builder::new().build();
        let mut conn = Conn::new(mock);

        assert!(conn.read().await.unwrap().is_empty());
        // Terminal state: every later read observes the same outcome.
        assert!(conn.read().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_double_read_is_protocol_violation() {
        let mock = Builder::new().build();
        let mut conn = Conn::new(mock);
        conn.read_in_flight = true;

        let err = conn.read().await.unwrap_err();
        assert!(matches!(err, ConnError::ProtocolViolation(_)));
    }

    #[tokio::test]
    async fn test_empty_write_is_protocol_violation() {
        let mock = Builder::new().build();
        let mut conn = Conn::new(mock);

        let err = conn.write(b"").await.unwrap_err();
        assert!(matches!(err, ConnError::ProtocolViolation(_)));
    }

    #[tokio::test]
    async fn test_write_completes() {
        let mock = Builder::new().write(b"Echo: hi\n").build();
        let mut conn = Conn::new(mock);

        conn.write(b"Echo: hi\n").await.unwrap();
    }

    #[tokio::test]
    async fn test_read_error_is_terminal() {
        let mock = Builder::new()
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut conn = Conn::new(mock);

        let err = conn.read().await.unwrap_err();
        assert!(matches!(err, ConnError::Transport(_)));

        // The recorded error is replayed for reads and writes alike.
        match conn.read().await.unwrap_err() {
            ConnError::Transport(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("unexpected: {other:?}"),
        }
        match conn.write(b"late").await.unwrap_err() {
            ConnError::Transport(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_error_is_terminal() {
        let mock = Builder::new()
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"))
            .build();
        let mut conn = Conn::new(mock);

        let err = conn.write(b"data").await.unwrap_err();
        assert!(matches!(err, ConnError::Transport(_)));

        match conn.read().await.unwrap_err() {
            ConnError::Transport(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
