//! Shared utilities for the Kokuban workspace.
//!
//! Logging setup and timestamp helpers used by the server binary and library.

pub mod logger;
pub mod time;
