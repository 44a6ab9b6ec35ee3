//! UseCase: ピアレプリケーション
//!
//! 他のサーバーインスタンスとのピアリンクで受け取ったスナップショットと
//! レコードを共有ステートストアに適用する。ピアから受け取ったレコードは
//! ローカルのクライアントにリレーするが、他のピアには再転送しない。
//! ループの防止は行わないため、エコーされた更新は再適用される。
//! 永続化は `PersistQueue` 経由で行い、書き込みの完了は待たない。

use std::sync::Arc;

use crate::domain::{
    Board, BoardRepository, ConnectionId, EditRecord, MessagePusher, PeerChannel, PeerRelay,
    UserName,
};

use super::disconnect_participant::evict_connections;
use super::persist::PersistQueue;

/// ピアレプリケーションのユースケース
pub struct ReplicatePeerUseCase {
    repository: Arc<dyn BoardRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    persist_queue: Arc<PersistQueue>,
    peer_relay: Arc<dyn PeerRelay>,
}

impl ReplicatePeerUseCase {
    /// 新しい ReplicatePeerUseCase を作成
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

    /// ピアリンクを転送先として登録
    ///
    /// 登録後に送られたローカルの編集はチャンネルに溜まり、書き込みタスクの
    /// 起動後に送信される。
    pub async fn attach_peer(&self, peer_id: ConnectionId, addr: String, sender: PeerChannel) {
        self.peer_relay.register_peer(peer_id, addr, sender).await;
    }

    /// ピアリンクを転送先から外す
    pub async fn detach_peer(&self, peer_id: &ConnectionId) {
        self.peer_relay.unregister_peer(peer_id).await;
    }

    /// ピアに送るスナップショット（`get_all()` と同じ内容）
    pub async fn snapshot(&self) -> Board {
        self.repository.get_all().await
    }

    /// ピアから受け取ったスナップショットをマージし、適用したレコード数を返す
    ///
    /// マージしたレコードは永続化するが、ローカルのクライアントにはリレーしない。
    pub async fn merge_snapshot(&self, snapshot: Board) -> usize {
        self.repository.merge_from(&snapshot).await;
        for record in snapshot.records() {
            self.persist_queue.enqueue(record);
        }
        snapshot.len()
    }

    /// ピアから受け取った 1 レコードを適用
    ///
    /// # Arguments
    ///
    /// * `record` - ピアから受け取ったレコード
    /// * `relay_json` - ローカルのクライアントへのリレー用 JSON（`name` なし）
    ///
    /// # Returns
    ///
    /// リレーに失敗して削除された参加者名のリスト
    pub async fn apply_record(&self, record: EditRecord, relay_json: &str) -> Vec<UserName> {
        self.repository.put(record.clone()).await;

        let failed = self.message_pusher.broadcast(None, relay_json).await;
        let evicted = evict_connections(self.message_pusher.as_ref(), failed).await;

        self.persist_queue.enqueue(record);
        evicted
    }
}
