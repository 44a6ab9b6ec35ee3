//! Domain errors

use thiserror::Error;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user name must not be empty")]
    UserNameEmpty,
}

/// 永続化ストア操作のエラー
#[derive(Debug, Error)]
pub enum DurableStoreError {
    #[error("durable store connection failed: {0}")]
    Connection(String),
    #[error("durable store command failed: {0}")]
    Command(String),
}

/// メッセージ送信（通知）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("name '{0}' is already in use")]
    NameTaken(String),
    #[error("client '{0}' not found")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
