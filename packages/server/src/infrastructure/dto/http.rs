//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// An online user as returned by `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub name: String,
    /// RFC 3339 formatted connection time
    pub connected_at: String,
}
