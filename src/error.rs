//! Error types for connection-level I/O.
//!
//! The taxonomy distinguishes caller bugs from transport failures:
//! - `ProtocolViolation`: the connection adapter's contract was misused
//!   (a second read issued while one is outstanding, or a zero-length
//!   write). Correctly sequenced code never produces this.
//! - `Transport`: the underlying socket reported a failure. The in-flight
//!   operation fails and the session terminates.
//!
//! Graceful end-of-stream is not an error; it surfaces as an empty read
//! result.

use std::io;

/// Failure of a connection-level read or write.
#[derive(Debug)]
pub enum ConnError {
    /// The adapter was called outside its contract.
    ProtocolViolation(&'static str),
    /// The underlying transport failed.
    Transport(io::Error),
}

impl std::fmt::Display for ConnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnError::ProtocolViolation(msg) => {
                write!(f, "connection contract violated: {msg}")
            }
            ConnError::Transport(e) => write!(f, "transport error: {e}"),
        }
    }
}

impl std::error::Error for ConnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnError::ProtocolViolation(_) => None,
            ConnError::Transport(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConnError {
    fn from(e: io::Error) -> Self {
        ConnError::Transport(e)
    }
}
