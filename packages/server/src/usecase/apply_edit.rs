//! UseCase: クライアントからの編集の適用
//!
//! ## 処理の順序
//!
//! 1. 共有ステートストアに `put`
//! 2. 送信者以外の全接続に、送信者名を付けてそのままリレー
//! 3. リレーに失敗した接続を削除（`leave` を通知）
//! 4. 全ピアへの転送
//! 5. 永続化キューへの投入（書き込みの完了は待たない）

use std::sync::Arc;

use crate::domain::{
    BoardRepository, ConnectionId, EditRecord, MessagePusher, PeerRelay, UserName,
};

use super::disconnect_participant::evict_connections;
use super::persist::PersistQueue;

/// 1 回の編集の適用結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// リレーに失敗して削除された参加者
    pub evicted: Vec<UserName>,
    /// 永続化キューに投入できたか
    pub queued: bool,
    /// 転送できたピア数
    pub forwarded_to_peers: usize,
}

/// 編集適用のユースケース
pub struct ApplyEditUseCase {
    repository: Arc<dyn BoardRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    persist_queue: Arc<PersistQueue>,
    peer_relay: Arc<dyn PeerRelay>,
}

impl ApplyEditUseCase {
    /// 新しい ApplyEditUseCase を作成
    pub fn new(
        repository: Arc<dyn BoardRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        persist_queue: Arc<PersistQueue>,
        peer_relay: Arc<dyn PeerRelay>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            persist_queue,
            peer_relay,
        }
    }

    /// 編集を適用
    ///
    /// # Arguments
    ///
    /// * `from` - 編集を送信した接続
    /// * `record` - 検証済みのレコード
    /// * `relay_json` - 送信者名を付与済みのリレー用 JSON
    pub async fn execute(
        &self,
        from: ConnectionId,
        record: EditRecord,
        relay_json: &str,
    ) -> EditOutcome {
        self.repository.put(record.clone()).await;

        let failed = self.message_pusher.broadcast(Some(from), relay_json).await;
        let evicted = evict_connections(self.message_pusher.as_ref(), failed).await;

        let forwarded_to_peers = self.peer_relay.forward(&record).await;

        tracing::debug!(
            "Applied edit '{}' ({:?}): forwarded to {} peer(s)",
            record.id,
            record.kind,
            forwarded_to_peers
        );

        let queued = self.persist_queue.enqueue(record);

        EditOutcome {
            evicted,
            queued,
            forwarded_to_peers,
        }
    }
}
