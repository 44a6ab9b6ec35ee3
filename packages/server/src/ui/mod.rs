//! Client-facing WebSocket/HTTP server, peer links and background tasks.

mod background;
mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use background::DurabilityScheduler;
pub use error::{ConnectionError, ServerError};
pub use server::{Server, router};
pub use state::AppState;
