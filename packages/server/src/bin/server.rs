//! Kokuban collaborative canvas sync server.
//!
//! Clients connect over WebSocket, the board is hydrated from a Redis-like
//! store on startup, and other instances are reached over TCP peer links.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kokuban-server
//! cargo run --bin kokuban-server -- --port 8050 --peer-port 9090 --peer 10.0.0.2:9090
//! cargo run --bin kokuban-server -- --in-memory
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use kokuban_server::{
    config::{
        DEFAULT_CLIENT_PORT, DEFAULT_FLUSH_SECS, DEFAULT_HOST, DEFAULT_KEEPALIVE_SECS,
        DEFAULT_PEER_PORT, DEFAULT_STORE_URL, ServerConfig,
    },
    domain::{Board, DurableStore},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        peer::TcpPeerRelay,
        repository::InMemoryBoardRepository,
        store::{InMemoryDurableStore, RedisDurableStore},
    },
    ui::{AppState, Server},
    usecase::HydrateBoardUseCase,
};
use kokuban_shared::logger::setup_logger;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "kokuban-server")]
#[command(about = "Real-time collaborative canvas sync server", long_about = None)]
struct Args {
    /// Host address to bind both listeners to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port for WebSocket clients and the HTTP API
    #[arg(short = 'p', long, default_value_t = DEFAULT_CLIENT_PORT)]
    port: u16,

    /// Port for peer replication links
    #[arg(long, default_value_t = DEFAULT_PEER_PORT)]
    peer_port: u16,

    /// Durable store URL
    #[arg(long, default_value = DEFAULT_STORE_URL)]
    store_url: String,

    /// Keep the board in process memory only (no durable store)
    #[arg(long, conflicts_with = "store_url")]
    in_memory: bool,

    /// Peer address to dial at startup (repeatable)
    #[arg(long = "peer")]
    peers: Vec<String>,

    /// Seconds between keepalive pings
    #[arg(long, default_value_t = DEFAULT_KEEPALIVE_SECS)]
    keepalive_secs: u64,

    /// Seconds between leader flushes of the whole board
    #[arg(long, default_value_t = DEFAULT_FLUSH_SECS)]
    flush_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            client_port: args.port,
            peer_port: args.peer_port,
            store_url: (!args.in_memory).then_some(args.store_url),
            peers: args.peers,
            keepalive_interval: Duration::from_secs(args.keepalive_secs),
            flush_interval: Duration::from_secs(args.flush_secs),
            ..Self::default()
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. Repository
    // 2. DurableStore / MessagePusher / PeerRelay
    // 3. Hydrate the board
    // 4. AppState (UseCases)
    // 5. Server

    // 1. Create Repository (in-memory shared state store)
    let repository = Arc::new(InMemoryBoardRepository::new(Arc::new(Mutex::new(
        Board::new(),
    ))));

    // 2. Create the remaining components
    let durable_store: Arc<dyn DurableStore> = match &config.store_url {
        Some(url) => match RedisDurableStore::open(url) {
            Ok(store) => {
                tracing::info!("Using durable store at {}", url);
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!("Invalid durable store URL '{}': {}", url, e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("Running without a durable store");
            Arc::new(InMemoryDurableStore::new())
        }
    };
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let peer_relay = Arc::new(TcpPeerRelay::new());

    // 3. Hydrate the board from the durable store
    HydrateBoardUseCase::new(repository.clone(), durable_store.clone())
        .execute()
        .await;

    // 4. Create UseCases
    let state = Arc::new(AppState::new(
        repository,
        message_pusher,
        durable_store,
        peer_relay,
    ));

    // 5. Create and run the server
    let server = Server::new(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
