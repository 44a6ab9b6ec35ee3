//! Peer link frames.
//!
//! Every frame is one JSON document followed by `\n`. The accepting side
//! sends a [`PeerSnapshot`] first; afterwards both sides exchange
//! [`PeerRecord`]s.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::ObjectKind;

/// Full board state keyed by flat key (see `ObjectKind::flat_key`).
pub type PeerSnapshot = HashMap<String, String>;

/// A single replicated write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
    pub id: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "ObjectKind::is_shape")]
    pub kind: ObjectKind,
}

/// Encode a frame as a single newline-terminated line.
pub fn encode_line<T: Serialize>(frame: &T) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(frame)?;
    line.push('\n');
    Ok(line)
}
