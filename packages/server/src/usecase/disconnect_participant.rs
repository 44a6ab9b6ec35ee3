//! UseCase: 参加者切断処理
//!
//! 読み込みエラー・クローズ・送信失敗のいずれの経路でも、接続の削除は
//! ここを通る。レジストリからの削除に成功した経路だけが `leave` を送るので、
//! 同じ接続に対して `leave` が 2 回送られることはない。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceEvent, PresenceKind, UserName};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// MessagePusher（接続レジストリとメッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 実際に削除された参加者名のリスト。`leave` の送信に失敗して連鎖的に
    /// 削除された参加者も含む。既に削除済みであれば空。
    pub async fn execute(&self, connection_id: ConnectionId) -> Vec<UserName> {
        evict_connections(self.message_pusher.as_ref(), vec![connection_id]).await
    }
}

/// 接続を順に削除し、削除できた接続ごとに残りの接続へ `leave` を送る
///
/// `leave` の送信に失敗した接続も同じワークリストに積んで削除する。
pub(crate) async fn evict_connections(
    message_pusher: &dyn MessagePusher,
    pending: Vec<ConnectionId>,
) -> Vec<UserName> {
    let mut pending = pending;
    let mut removed = Vec::new();

    while let Some(connection_id) = pending.pop() {
        let Some(name) = message_pusher.unregister_client(&connection_id).await else {
            continue;
        };
        tracing::info!("Participant '{}' ({}) left", name, connection_id);

        let users = message_pusher
            .participants()
            .await
            .into_iter()
            .map(|p| p.name)
            .collect();
        let event = PresenceEvent {
            kind: PresenceKind::Leave,
            user: name.clone(),
            users,
        };
        let failed = message_pusher.broadcast_presence(None, &event).await;
        pending.extend(failed);
        removed.push(name);
    }

    removed
}
