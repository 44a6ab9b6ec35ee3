//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（通知）と、接続中クライアントのレジストリ
//! （PresenceSet + ConnectionSet）のインターフェース。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Participant, PresenceEvent, Timestamp, UserName};

/// 1 接続の書き込みタスクへ渡すフレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// JSON テキストフレーム
    Text(String),
    /// キープアライブ用の ping（ペイロードなし）
    Ping,
}

/// クライアントへのメッセージ送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// MessagePusher trait
///
/// 表示名の一意性の確認と登録は 1 つのロックの下でアトミックに行うこと。
/// ブロードキャストは受信者ごとのベストエフォートで、送信に失敗した接続の
/// ID を返す。失敗した接続の削除は呼び出し側（UseCase）が行う。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 名前が未使用であれば接続を登録
    async fn register_client(
        &self,
        connection_id: ConnectionId,
        name: UserName,
        connected_at: Timestamp,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError>;

    /// 接続を登録解除し、解放された名前を返す（既に削除済みなら `None`）
    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<UserName>;

    /// 特定の接続に送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        frame: OutboundFrame,
    ) -> Result<(), MessagePushError>;

    /// `exclude` 以外の全接続にテキストを送信し、失敗した接続を返す
    async fn broadcast(&self, exclude: Option<ConnectionId>, content: &str) -> Vec<ConnectionId>;

    /// `exclude` 以外の全接続に join/leave イベントを送信し、失敗した接続を返す
    async fn broadcast_presence(
        &self,
        exclude: Option<ConnectionId>,
        event: &PresenceEvent,
    ) -> Vec<ConnectionId>;

    /// 全接続に ping を送信し、失敗した接続を返す
    async fn ping_all(&self) -> Vec<ConnectionId>;

    /// 接続中の参加者一覧（名前順）
    async fn participants(&self) -> Vec<Participant>;
}
