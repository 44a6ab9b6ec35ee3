//! Server execution logic.

use std::future::Future;
use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::{
    background::{DurabilityScheduler, spawn_liveness_monitor},
    error::ServerError,
    handler::{
        debug_board_state, get_users, health_check, spawn_peer_dialer, spawn_peer_listener,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the client-facing router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/debug/board", get(debug_board_state))
        .route("/api/health", get(health_check))
        .route("/api/users", get(get_users))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Collaborative canvas sync server
///
/// Owns the client listener (WebSocket + HTTP), the peer listener and the
/// background tasks.
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::new(repository, message_pusher, durable_store, peer_relay));
/// Server::new(ServerConfig::default(), state).run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Bind both listeners and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if either port cannot be bound or if the HTTP server
    /// fails.
    pub async fn run(self) -> Result<(), ServerError> {
        let client_listener = bind(&self.config.client_addr()).await?;
        let peer_listener = bind(&self.config.peer_addr()).await?;
        self.serve(client_listener, peer_listener, shutdown_signal())
            .await
    }

    /// Serve on already-bound listeners until `shutdown` resolves.
    pub async fn serve<F>(
        self,
        client_listener: TcpListener,
        peer_listener: TcpListener,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self { config, state } = self;

        tracing::info!(
            "Kokuban server listening on {}",
            client_listener.local_addr()?
        );
        tracing::info!("Peer links listening on {}", peer_listener.local_addr()?);

        let mut background = vec![
            spawn_peer_listener(peer_listener, state.clone()),
            spawn_liveness_monitor(state.keepalive_usecase.clone(), config.keepalive_interval),
            Arc::new(DurabilityScheduler::new(
                state.flush_board_usecase.clone(),
                config.election_delay_ms.clone(),
                config.flush_interval,
            ))
            .spawn(),
        ];
        for addr in config.peers {
            background.push(spawn_peer_dialer(addr, state.clone()));
        }

        tracing::info!("Press Ctrl+C to shutdown gracefully");
        axum::serve(client_listener, router(state))
            .with_graceful_shutdown(shutdown)
            .await?;

        for handle in background {
            handle.abort();
        }
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}
