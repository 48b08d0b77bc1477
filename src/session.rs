//! Per-connection session loop.
//!
//! Drives the read/extract/dispatch/write cycle: pull chunks through the
//! connection adapter into the framing buffer, drain every complete message
//! (one reply per iteration) before the next read, and stop on end-of-stream
//! or the quit sentinel. Control flow is strictly sequential, so no second
//! read reaches the transport while a reply write is still in flight.

use crate::buffer::DynBuf;
use crate::conn::Conn;
use crate::error::ConnError;
use crate::protocol::{self, Reply};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::trace;

/// Run one session to completion.
///
/// Returns `Ok(())` on end-of-stream or after the farewell reply to `quit`.
/// Transport failures propagate to the caller; bytes of an unfinished
/// message stay buffered and are never acted upon.
pub async fn serve<S>(conn: &mut Conn<S>) -> Result<(), ConnError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = DynBuf::new();

    loop {
        let Some(msg) = buf.cut_message() else {
            let chunk = conn.read().await?;
            if chunk.is_empty() {
                trace!(buffered = buf.len(), "end of stream");
                return Ok(());
            }
            buf.push(&chunk);
            continue;
        };

        trace!(len = msg.len(), "dispatching message");
        match protocol::dispatch(&msg) {
            Reply::Echo(payload) => conn.write(&payload).await?,
            Reply::Bye => {
                conn.write(protocol::BYE).await?;
                return Ok(());
            }
        }
    }
}
