//! echoline: a line-oriented TCP echo server.
//!
//! Each connection is served by its own task through a demand-driven
//! adapter: no data is pulled from the socket until the session asks for
//! it, and every reply is fully accepted by the transport before the next
//! message is dispatched. Messages are newline-delimited; `quit` ends the
//! session with a farewell.
//!
//! Features:
//! - Explicit backpressure between network read and network write
//! - Incremental framing of partial and batched messages
//! - Configuration via CLI arguments or TOML file

mod buffer;
mod config;
mod conn;
mod error;
mod protocol;
mod server;
mod session;

use config::Config;
use server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        listen = %config.listen,
        max_connections = config.max_connections,
        "Starting echoline server"
    );

    Server::new(config).run().await
}
