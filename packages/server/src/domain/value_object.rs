//! Value objects
//!
//! 不変で、値によって等価性が判断されるドメインの基本型を定義します。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// テキストオブジェクトの永続化キーに付与するプレフィックス
pub const TEXT_KEY_PREFIX: &str = "text:";

/// ID がプレフィックスと紛らわしい図形の永続化キーに付与するプレフィックス
pub const SHAPE_KEY_PREFIX: &str = "shape:";

/// 接続ごとにサーバーが割り当てる識別子
///
/// クライアント接続とピア接続の両方のハンドルとして使用します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しいランダムな ConnectionId を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 接続中のユーザーの表示名
///
/// 空文字列は受け付けません。それ以外の制約（長さ・文字種）はありません。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::UserNameEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// ボード上のオブジェクトの種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Shape,
    Text,
}

fn has_key_prefix(id: &str) -> bool {
    id.starts_with(TEXT_KEY_PREFIX) || id.starts_with(SHAPE_KEY_PREFIX)
}

impl ObjectKind {
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape)
    }

    /// 永続化ストアおよびピアスナップショットで使うフラットなキーを生成
    ///
    /// 図形は ID そのままだが、ID がいずれかのプレフィックスで始まる場合は
    /// `shape:` を付けて、テキストのキーと区別できるようにする。
    pub fn flat_key(&self, id: &str) -> String {
        match self {
            Self::Shape if has_key_prefix(id) => format!("{SHAPE_KEY_PREFIX}{id}"),
            Self::Shape => id.to_string(),
            Self::Text => format!("{TEXT_KEY_PREFIX}{id}"),
        }
    }

    /// フラットなキーを種類と ID に分解（`flat_key` の逆変換）
    pub fn split_flat_key(key: &str) -> (Self, &str) {
        if let Some(id) = key.strip_prefix(SHAPE_KEY_PREFIX) {
            return (Self::Shape, id);
        }
        match key.strip_prefix(TEXT_KEY_PREFIX) {
            Some(id) => (Self::Text, id),
            None => (Self::Shape, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_valid() {
        // テスト項目: 空でない名前から UserName を生成できる
        // given (前提条件):
        let value = "alice".to_string();

        // when (操作):
        let result = UserName::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_user_name_empty_is_rejected() {
        // テスト項目: 空文字列の名前は拒否される
        // given (前提条件):
        let empty = String::new();

        // when (操作):
        let result = UserName::new(empty);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::UserNameEmpty));
    }

    #[test]
    fn test_user_name_accepts_long_and_blank_names() {
        // テスト項目: 空でなければ長い名前や空白のみの名前も受け付ける
        // given (前提条件):
        let long = "a".repeat(500);
        let blank = "   ".to_string();

        // when (操作):
        let long_result = UserName::try_from(long.clone());
        let blank_result = UserName::try_from(blank);

        // then (期待する結果):
        assert_eq!(long_result.map(UserName::into_string), Ok(long));
        assert!(blank_result.is_ok());
    }

    #[test]
    fn test_connection_id_generate_is_unique() {
        // テスト項目: 生成される ConnectionId は毎回異なる
        // given (前提条件):

        // when (操作):
        let id1 = ConnectionId::generate();
        let id2 = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_flat_key_round_trip_for_text() {
        // テスト項目: テキストのキーはプレフィックス付きで生成され、分解すると元に戻る
        // given (前提条件):
        let key = ObjectKind::Text.flat_key("t1");

        // when (操作):
        let (kind, id) = ObjectKind::split_flat_key(&key);

        // then (期待する結果):
        assert_eq!(key, "text:t1");
        assert_eq!(kind, ObjectKind::Text);
        assert_eq!(id, "t1");
    }

    #[test]
    fn test_flat_key_for_shape_is_bare_id() {
        // テスト項目: 図形のキーは ID そのまま
        // given (前提条件):
        let key = ObjectKind::Shape.flat_key("s1");

        // when (操作):
        let (kind, id) = ObjectKind::split_flat_key(&key);

        // then (期待する結果):
        assert_eq!(key, "s1");
        assert_eq!(kind, ObjectKind::Shape);
        assert_eq!(id, "s1");
    }

    #[test]
    fn test_flat_key_escapes_shape_ids_that_look_prefixed() {
        // テスト項目: プレフィックスで始まる図形の ID は shape: 付きのキーになり、図形として戻る
        // given (前提条件):
        let ids = ["text:abc", "shape:x", "shape:"];

        for id in ids {
            // when (操作):
            let key = ObjectKind::Shape.flat_key(id);
            let (kind, restored) = ObjectKind::split_flat_key(&key);

            // then (期待する結果):
            assert_eq!(key, format!("shape:{id}"));
            assert_eq!(kind, ObjectKind::Shape);
            assert_eq!(restored, id);
        }
    }

    #[test]
    fn test_flat_key_for_text_with_shape_like_id() {
        // テスト項目: shape: で始まるテキストの ID もテキストとして戻る
        // given (前提条件):
        let key = ObjectKind::Text.flat_key("shape:x");

        // when (操作):
        let (kind, id) = ObjectKind::split_flat_key(&key);

        // then (期待する結果):
        assert_eq!(key, "text:shape:x");
        assert_eq!(kind, ObjectKind::Text);
        assert_eq!(id, "shape:x");
    }
}
