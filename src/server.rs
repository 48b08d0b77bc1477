//! TCP server for the line echo protocol.
//!
//! Accepts connections and runs each session on its own task. Sessions
//! share no mutable state, so connections only interact through the
//! accept-slot semaphore.

use crate::config::Config;
use crate::conn::Conn;
use crate::session;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

/// Server instance
pub struct Server {
    config: Config,
    connection_limit: Arc<Semaphore>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        let connection_limit = Arc::new(Semaphore::new(config.max_connections));
        Server {
            config,
            connection_limit,
        }
    }

    /// Bind the configured address and begin accepting connections
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(&self.config.listen).await?;
        info!(address = %self.config.listen, "Server listening");
        Ok(self.accept_loop(listener).await?)
    }

    async fn accept_loop(
        &self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        loop {
            // Wait for a connection slot
            let permit = self.connection_limit.clone().acquire_owned().await?;

            match listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(peer = %addr, "New connection");

                    tokio::spawn(async move {
                        handle_connection(stream).await;
                        drop(permit);
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

/// Run one client session, then release the socket.
///
/// This is the single recovery boundary: read/write failures arrive here
/// unhandled, get logged, and the socket is closed by dropping the adapter,
/// which runs on every exit path.
async fn handle_connection(stream: TcpStream) {
    let mut conn = Conn::new(stream);
    match session::serve(&mut conn).await {
        Ok(()) => debug!("Session finished"),
        Err(e) => debug!(error = %e, "Session failed"),
    }
}
