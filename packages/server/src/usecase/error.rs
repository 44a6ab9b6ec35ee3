//! UseCase errors

use thiserror::Error;

/// 参加者接続（ハンドシェイク）のエラー
///
/// `Display` の文言はそのままクライアントへのエラーフレームに使われる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Invalid or missing name")]
    InvalidName,
    #[error("Username already taken")]
    NameTaken(String),
    #[error("Registration failed")]
    RegistrationFailed(String),
}

/// ピアリンクのエラー（そのリンクのループだけを終了させる）
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed peer frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("peer closed the link before sending a snapshot")]
    Closed,
}
