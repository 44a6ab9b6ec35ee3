//! Real-time collaborative canvas sync server library.
//!
//! Clients hold WebSocket connections, draw shapes and text, and see each
//! other's edits immediately. The board is hydrated from a durable key-value
//! store on startup, replicated to other server instances over TCP peer
//! links, and periodically flushed by a self-elected leader.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
