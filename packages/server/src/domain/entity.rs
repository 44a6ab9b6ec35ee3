//! Domain entities

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value_object::{ConnectionId, ObjectKind, Timestamp, UserName};

/// A single shape or text write.
///
/// `data` is opaque serialized content and is never parsed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    pub kind: ObjectKind,
    pub id: String,
    pub data: String,
}

impl EditRecord {
    pub fn new(kind: ObjectKind, id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            data: data.into(),
        }
    }

    pub fn shape(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self::new(ObjectKind::Shape, id, data)
    }

    pub fn text(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self::new(ObjectKind::Text, id, data)
    }

    /// Key used in the durable store and in peer snapshots.
    pub fn flat_key(&self) -> String {
        self.kind.flat_key(&self.id)
    }
}

/// Board contents: grow/update-only maps of id → content.
///
/// Writes are last-write-wins by application order. There is no logical
/// clock, no tombstone and no tie-break, so two writers racing on the same
/// id end with whichever write was applied last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub shapes: HashMap<String, String>,
    pub texts: HashMap<String, String>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite one record.
    pub fn put(&mut self, record: EditRecord) {
        let map = match record.kind {
            ObjectKind::Shape => &mut self.shapes,
            ObjectKind::Text => &mut self.texts,
        };
        map.insert(record.id, record.data);
    }

    /// Apply every record of `other`, id by id, as repeated `put`.
    pub fn merge(&mut self, other: &Board) {
        for record in other.records() {
            self.put(record);
        }
    }

    /// Iterate over every record as an owned `EditRecord`.
    pub fn records(&self) -> impl Iterator<Item = EditRecord> + '_ {
        let shapes = self
            .shapes
            .iter()
            .map(|(id, data)| EditRecord::shape(id.clone(), data.clone()));
        let texts = self
            .texts
            .iter()
            .map(|(id, data)| EditRecord::text(id.clone(), data.clone()));
        shapes.chain(texts)
    }

    /// Flatten into a single key → content map (text keys are prefixed).
    pub fn to_flat(&self) -> HashMap<String, String> {
        self.records()
            .map(|record| (record.flat_key(), record.data))
            .collect()
    }

    /// Rebuild a board from a flat key → content map.
    pub fn from_flat(flat: HashMap<String, String>) -> Self {
        let mut board = Self::new();
        for (key, data) in flat {
            let (kind, id) = ObjectKind::split_flat_key(&key);
            board.put(EditRecord::new(kind, id, data));
        }
        board
    }

    pub fn len(&self) -> usize {
        self.shapes.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 接続中の参加者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub name: UserName,
    pub connected_at: Timestamp,
}

/// Presence event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Join,
    Leave,
}

/// A join/leave notification with the presence list after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEvent {
    pub kind: PresenceKind,
    pub user: UserName,
    pub users: Vec<UserName>,
}
