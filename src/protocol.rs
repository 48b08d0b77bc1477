//! Line protocol dispatch.
//!
//! Maps a complete extracted message to a reply action. Messages arrive
//! delimiter-inclusive, so the quit sentinel comparison includes the
//! trailing newline. Pure byte-level logic, no I/O.

use bytes::{BufMut, Bytes, BytesMut};

/// Reply prefix for echoed messages.
pub const ECHO_PREFIX: &[u8] = b"Echo: ";

/// Sentinel message that terminates the session.
pub const QUIT: &[u8] = b"quit\n";

/// Farewell reply sent before closing on `quit`.
pub const BYE: &[u8] = b"Bye.\n";

/// Action decided for one extracted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Send the payload and keep the session open.
    Echo(Bytes),
    /// Send the farewell and terminate the session.
    Bye,
}

/// Decide the reply for a complete message (delimiter included).
pub fn dispatch(msg: &[u8]) -> Reply {
    if msg == QUIT {
        return Reply::Bye;
    }

    let mut payload = BytesMut::with_capacity(ECHO_PREFIX.len() + msg.len());
    payload.put_slice(ECHO_PREFIX);
    payload.put_slice(msg);
    Reply::Echo(payload.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_reply() {
        match dispatch(b"hello\n") {
            Reply::Echo(payload) => assert_eq!(&payload[..], b"Echo: hello\n"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_quit_sentinel() {
        assert_eq!(dispatch(b"quit\n"), Reply::Bye);
    }

    #[test]
    fn test_quit_requires_exact_match() {
        // Anything beyond the exact sentinel bytes is just a line.
        match dispatch(b"quit he said\n") {
            Reply::Echo(payload) => assert_eq!(&payload[..], b"Echo: quit he said\n"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_opaque_bytes_echoed() {
        let msg = [0xff, 0x00, 0x7f, b'\n'];
        match dispatch(&msg) {
            Reply::Echo(payload) => {
                assert_eq!(&payload[..6], ECHO_PREFIX);
                assert_eq!(&payload[6..], &msg[..]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_empty_line_echoed() {
        match dispatch(b"\n") {
            Reply::Echo(payload) => assert_eq!(&payload[..], b"Echo: \n"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
