//! WebSocket frame DTOs.
//!
//! All frames are JSON text frames. Client edits are relayed verbatim: the
//! original JSON object is kept as-is and only the `name` field is
//! (over)written with the sender's display name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{EditRecord, ObjectKind, UserName};

/// First frame sent by a client.
///
/// A missing `name` deserializes to an empty string and is rejected later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HandshakeMessage {
    #[serde(default)]
    pub name: String,
}

impl HandshakeMessage {
    /// Parse a handshake frame. Anything that is not a JSON object with a
    /// string `name` yields an empty name.
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }
}

/// Sent before closing a rejected connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Init,
    Join,
    Leave,
}

/// Full board state and presence list, sent once to a newly named client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitMessage {
    pub r#type: MessageType,
    pub shapes: HashMap<String, String>,
    pub texts: HashMap<String, String>,
    pub users: Vec<String>,
}

/// `join` / `leave` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceMessage {
    pub r#type: MessageType,
    pub user: String,
    pub users: Vec<String>,
}

/// Edit frame as produced by the server for peer-originated records, and
/// as seen by clients on relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditMessage {
    pub id: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "ObjectKind::is_shape")]
    pub kind: ObjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("frame is not a JSON object")]
    NotAnObject,
    #[error("missing or non-string field '{0}'")]
    MissingField(&'static str),
    #[error("unknown object kind '{0}'")]
    UnknownKind(String),
}

/// A validated client edit together with the original JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEdit {
    pub record: EditRecord,
    fields: Map<String, Value>,
}

impl InboundEdit {
    /// Validate an inbound frame: it must be an object with string `id` and
    /// `data`, and an optional `kind` of `"shape"` or `"text"`.
    pub fn parse(text: &str) -> Result<Self, EditParseError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| EditParseError::InvalidJson(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(EditParseError::NotAnObject);
        };

        let id = string_field(&fields, "id")?;
        let data = string_field(&fields, "data")?;
        let kind = match fields.get("kind") {
            None => ObjectKind::Shape,
            Some(Value::String(kind)) if kind == "shape" => ObjectKind::Shape,
            Some(Value::String(kind)) if kind == "text" => ObjectKind::Text,
            Some(other) => return Err(EditParseError::UnknownKind(other.to_string())),
        };

        Ok(Self {
            record: EditRecord::new(kind, id, data),
            fields,
        })
    }

    /// The original object with `name` set to the sender, as a JSON string.
    pub fn relay_json(&self, sender: &UserName) -> String {
        let mut fields = self.fields.clone();
        fields.insert("name".to_string(), Value::String(sender.as_str().to_string()));
        Value::Object(fields).to_string()
    }
}

fn string_field(fields: &Map<String, Value>, key: &'static str) -> Result<String, EditParseError> {
    match fields.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        _ => Err(EditParseError::MissingField(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserName {
        UserName::new("alice".to_string()).unwrap()
    }

    #[test]
    fn test_handshake_parse() {
        // テスト項目: ハンドシェイクから名前を取り出せる。不正な形式は空の名前になる
        // given (前提条件):
        let valid = r#"{"name":"alice"}"#;
        let missing = r#"{"user":"alice"}"#;
        let garbage = "hello";

        // when (操作):
        let valid = HandshakeMessage::parse(valid);
        let missing = HandshakeMessage::parse(missing);
        let garbage = HandshakeMessage::parse(garbage);

        // then (期待する結果):
        assert_eq!(valid.name, "alice");
        assert_eq!(missing.name, "");
        assert_eq!(garbage.name, "");
    }

    #[test]
    fn test_parse_valid_shape_edit() {
        // テスト項目: id と data を持つフレームは図形の編集として解釈される
        // given (前提条件):
        let text = r#"{"id":"s1","data":"rect:10,10,50,50"}"#;

        // when (操作):
        let edit = InboundEdit::parse(text).unwrap();

        // then (期待する結果):
        assert_eq!(edit.record, EditRecord::shape("s1", "rect:10,10,50,50"));
    }

    #[test]
    fn test_parse_text_edit() {
        // テスト項目: kind が text のフレームはテキストの編集として解釈される
        // given (前提条件):
        let text = r#"{"id":"t1","data":"Hello","kind":"text"}"#;

        // when (操作):
        let edit = InboundEdit::parse(text).unwrap();

        // then (期待する結果):
        assert_eq!(edit.record, EditRecord::text("t1", "Hello"));
    }

    #[test]
    fn test_parse_rejects_malformed_frames() {
        // テスト項目: id/data が文字列でないフレームや不正な JSON は拒否される
        // given (前提条件):
        let cases = [
            ("not json", "invalid"),
            ("[1,2]", "object"),
            (r#"{"data":"x"}"#, "id"),
            (r#"{"id":1,"data":"x"}"#, "id"),
            (r#"{"id":"s1"}"#, "data"),
            (r#"{"id":"s1","data":"x","kind":"sticker"}"#, "kind"),
        ];

        for (text, reason) in cases {
            // when (操作):
            let result = InboundEdit::parse(text);

            // then (期待する結果):
            assert!(result.is_err(), "expected rejection ({reason}): {text}");
        }
    }

    #[test]
    fn test_relay_json_keeps_fields_and_overwrites_name() {
        // テスト項目: リレーは元のフィールドを保持し、name を送信者で上書きする
        // given (前提条件):
        let text = r#"{"id":"s1","data":"rect","color":"red","name":"mallory"}"#;
        let edit = InboundEdit::parse(text).unwrap();

        // when (操作):
        let relay: Value = serde_json::from_str(&edit.relay_json(&alice())).unwrap();

        // then (期待する結果):
        assert_eq!(relay["id"], "s1");
        assert_eq!(relay["data"], "rect");
        assert_eq!(relay["color"], "red");
        assert_eq!(relay["name"], "alice");
    }

    #[test]
    fn test_presence_message_serialization() {
        // テスト項目: presence メッセージが type/user/users を持つ JSON になる
        // given (前提条件):
        let message = PresenceMessage {
            r#type: MessageType::Join,
            user: "bob".to_string(),
            users: vec!["alice".to_string(), "bob".to_string()],
        };

        // when (操作):
        let json = serde_json::to_string(&message).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"join","user":"bob","users":["alice","bob"]}"#);
    }
}
