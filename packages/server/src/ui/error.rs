//! Server-level errors: fatal startup/serve failures and per-connection write failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Failure while writing a server frame to one client connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write to socket: {0}")]
    Socket(#[from] axum::Error),
}
