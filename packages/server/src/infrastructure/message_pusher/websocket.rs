//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続中クライアントのレジストリ（ConnectionSet と PresenceSet）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast, ping_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成と実際のソケット書き込みは UI 層（`ui/handler/websocket.rs`）の
//! 書き込みタスクが行います。この実装は各接続の `UnboundedSender` にフレームを
//! 渡すだけです。
//!
//! ブロードキャストでは、ロックの下で送信先のスナップショットを取り、
//! ロックを解放してから送信します。送信に失敗した接続はレジストリから
//! 削除せず、呼び出し側に返します（leave の通知は UseCase が行う）。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, OutboundFrame, Participant, PresenceEvent,
    PusherChannel, Timestamp, UserName,
};
use crate::infrastructure::dto::websocket::PresenceMessage;

/// 1 接続分の登録情報（ConnectionEntry）
struct ClientEntry {
    name: UserName,
    connected_at: Timestamp,
    sender: PusherChannel,
}

/// 接続のレジストリ
///
/// `names` は `clients` の表示名と 1:1 で対応する。
#[derive(Default)]
struct ClientRegistry {
    clients: HashMap<ConnectionId, ClientEntry>,
    names: HashSet<UserName>,
}

impl ClientRegistry {
    fn recipients(&self, exclude: Option<ConnectionId>) -> Vec<(ConnectionId, PusherChannel)> {
        self.clients
            .iter()
            .filter(|(id, _)| Some(**id) != exclude)
            .map(|(id, entry)| (*id, entry.sender.clone()))
            .collect()
    }
}

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    registry: Mutex<ClientRegistry>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信先のスナップショットを取り、ロックの外で送信する
    async fn send_to_all(
        &self,
        exclude: Option<ConnectionId>,
        frame: OutboundFrame,
    ) -> Vec<ConnectionId> {
        let recipients = {
            let registry = self.registry.lock().await;
            registry.recipients(exclude)
        };

        let mut failed = Vec::new();
        for (connection_id, sender) in recipients {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = sender.send(frame.clone()) {
                tracing::warn!("Failed to push frame to connection '{}': {}", connection_id, e);
                failed.push(connection_id);
            }
        }
        failed
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(
        &self,
        connection_id: ConnectionId,
        name: UserName,
        connected_at: Timestamp,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError> {
        let mut registry = self.registry.lock().await;
        if registry.names.contains(&name) {
            return Err(MessagePushError::NameTaken(name.into_string()));
        }

        registry.names.insert(name.clone());
        registry.clients.insert(
            connection_id,
            ClientEntry {
                name: name.clone(),
                connected_at,
                sender,
            },
        );
        tracing::debug!("Client '{}' ({}) registered to MessagePusher", name, connection_id);
        Ok(())
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> Option<UserName> {
        let mut registry = self.registry.lock().await;
        let entry = registry.clients.remove(connection_id)?;
        registry.names.remove(&entry.name);
        tracing::debug!(
            "Client '{}' ({}) unregistered from MessagePusher",
            entry.name,
            connection_id
        );
        Some(entry.name)
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        frame: OutboundFrame,
    ) -> Result<(), MessagePushError> {
        let sender = {
            let registry = self.registry.lock().await;
            registry
                .clients
                .get(connection_id)
                .map(|entry| entry.sender.clone())
        };

        let Some(sender) = sender else {
            return Err(MessagePushError::ClientNotFound(connection_id.to_string()));
        };
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed frame to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, exclude: Option<ConnectionId>, content: &str) -> Vec<ConnectionId> {
        self.send_to_all(exclude, OutboundFrame::Text(content.to_string()))
            .await
    }

    async fn broadcast_presence(
        &self,
        exclude: Option<ConnectionId>,
        event: &PresenceEvent,
    ) -> Vec<ConnectionId> {
        let message = PresenceMessage::from(event);
        match serde_json::to_string(&message) {
            Ok(json) => self.send_to_all(exclude, OutboundFrame::Text(json)).await,
            Err(e) => {
                tracing::error!("Failed to serialize presence event: {}", e);
                Vec::new()
            }
        }
    }

    async fn ping_all(&self) -> Vec<ConnectionId> {
        self.send_to_all(None, OutboundFrame::Ping).await
    }

    async fn participants(&self) -> Vec<Participant> {
        let registry = self.registry.lock().await;
        let mut participants: Vec<Participant> = registry
            .clients
            .iter()
            .map(|(connection_id, entry)| Participant {
                connection_id: *connection_id,
                name: entry.name.clone(),
                connected_at: entry.connected_at,
            })
            .collect();

        // Sort by name for consistent ordering
        participants.sort_by(|a, b| a.name.cmp(&b.name));
        participants
    }
}
