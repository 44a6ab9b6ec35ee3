//! Conversion logic between DTOs and domain entities.

use kokuban_shared::time::timestamp_to_rfc3339;

use crate::domain::{Board, EditRecord, Participant, PresenceEvent, PresenceKind, UserName};
use crate::infrastructure::dto::{http, peer, websocket as ws};

// ========================================
// DTO → Domain Entity
// ========================================

impl From<peer::PeerRecord> for EditRecord {
    fn from(dto: peer::PeerRecord) -> Self {
        Self::new(dto.kind, dto.id, dto.data)
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&EditRecord> for peer::PeerRecord {
    fn from(model: &EditRecord) -> Self {
        Self {
            id: model.id.clone(),
            data: model.data.clone(),
            kind: model.kind,
        }
    }
}

impl From<&EditRecord> for ws::EditMessage {
    fn from(model: &EditRecord) -> Self {
        Self {
            id: model.id.clone(),
            data: model.data.clone(),
            kind: model.kind,
            name: None,
        }
    }
}

impl From<&PresenceEvent> for ws::PresenceMessage {
    fn from(model: &PresenceEvent) -> Self {
        let r#type = match model.kind {
            PresenceKind::Join => ws::MessageType::Join,
            PresenceKind::Leave => ws::MessageType::Leave,
        };
        Self {
            r#type,
            user: model.user.as_str().to_string(),
            users: user_names(&model.users),
        }
    }
}

impl From<&Participant> for http::UserDto {
    fn from(model: &Participant) -> Self {
        Self {
            name: model.name.as_str().to_string(),
            connected_at: timestamp_to_rfc3339(model.connected_at.value()),
        }
    }
}

impl ws::InitMessage {
    /// Build the init frame from a board snapshot and the participant list.
    pub fn new(board: Board, participants: &[Participant]) -> Self {
        Self {
            r#type: ws::MessageType::Init,
            shapes: board.shapes,
            texts: board.texts,
            users: participants
                .iter()
                .map(|p| p.name.as_str().to_string())
                .collect(),
        }
    }
}

fn user_names(users: &[UserName]) -> Vec<String> {
    users.iter().map(|u| u.as_str().to_string()).collect()
}
