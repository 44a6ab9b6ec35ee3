//! Request and connection handlers.

mod http;
mod peer;
mod websocket;

pub use http::{debug_board_state, get_users, health_check};
pub use peer::{spawn_peer_dialer, spawn_peer_listener};
pub use websocket::websocket_handler;
