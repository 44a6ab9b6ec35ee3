//! Data Transfer Objects (DTOs) for the canvas server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: client-facing WebSocket frames
//! - `peer`: newline-delimited JSON frames on peer links
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod peer;
pub mod websocket;
