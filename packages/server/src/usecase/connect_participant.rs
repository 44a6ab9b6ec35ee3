//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 表示名の検証と一意性チェック、join の通知、init 用スナップショット
//!
//! ### どのような状況を想定しているか
//! - 正常系：新しい名前での接続
//! - 異常系：使用中の名前、空の名前
//! - エッジケース：join の送信に失敗した既存接続の削除

use std::sync::Arc;

use kokuban_shared::time::get_timestamp_millis;

use crate::domain::{
    Board, BoardRepository, ConnectionId, MessagePushError, MessagePusher, Participant,
    PresenceEvent, PresenceKind, PusherChannel, Timestamp, UserName,
};

use super::disconnect_participant::evict_connections;
use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（共有ステートストアの抽象化）
    repository: Arc<dyn BoardRepository>,
    /// MessagePusher（接続レジストリとメッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn BoardRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者接続を実行
    ///
    /// 名前の一意性チェックと登録は MessagePusher の 1 つのロックの下で行われる。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 接続の ID
    /// * `name` - ハンドシェイクで受け取った表示名（未検証）
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Participant)` - 登録された参加者
    /// * `Err(ConnectError)` - 名前が不正、または使用中
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        name: String,
        sender: PusherChannel,
    ) -> Result<Participant, ConnectError> {
        let name = UserName::new(name).map_err(|_| ConnectError::InvalidName)?;
        let connected_at = Timestamp::new(get_timestamp_millis());

        self.message_pusher
            .register_client(connection_id, name.clone(), connected_at, sender)
            .await
            .map_err(|e| match e {
                MessagePushError::NameTaken(name) => ConnectError::NameTaken(name),
                other => ConnectError::RegistrationFailed(other.to_string()),
            })?;

        Ok(Participant {
            connection_id,
            name,
            connected_at,
        })
    }

    /// 参加者が join したことを他の全接続にブロードキャスト
    ///
    /// # Returns
    ///
    /// 送信に失敗して削除された参加者名のリスト
    pub async fn broadcast_participant_joined(&self, participant: &Participant) -> Vec<UserName> {
        let event = PresenceEvent {
            kind: PresenceKind::Join,
            user: participant.name.clone(),
            users: self.user_names().await,
        };
        let failed = self
            .message_pusher
            .broadcast_presence(Some(participant.connection_id), &event)
            .await;
        evict_connections(self.message_pusher.as_ref(), failed).await
    }

    /// init フレーム用のボードのスナップショットと参加者一覧を取得
    pub async fn build_init_state(&self) -> (Board, Vec<Participant>) {
        let board = self.repository.get_all().await;
        let participants = self.message_pusher.participants().await;
        (board, participants)
    }

    async fn user_names(&self) -> Vec<UserName> {
        self.message_pusher
            .participants()
            .await
            .into_iter()
            .map(|p| p.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EditRecord;
    use crate::infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryBoardRepository,
    };
    use crate::usecase::test_support::{drain_json, name, register};
    use tokio::sync::mpsc;

    fn create_usecase() -> (
        ConnectParticipantUseCase,
        Arc<InMemoryBoardRepository>,
        Arc<WebSocketMessagePusher>,
    ) {
        let repository = Arc::new(InMemoryBoardRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = ConnectParticipantUseCase::new(repository.clone(), pusher.clone());
        (usecase, repository, pusher)
    }

    #[tokio::test]
    async fn test_connect_with_fresh_name_adds_one_participant() {
        // テスト項目: 新しい名前での接続で参加者が 1 人だけ追加される
        // given (前提条件):
        let (usecase, _repository, pusher) = create_usecase();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();

        // when (操作):
        let participant = usecase
            .execute(connection_id, "alice".to_string(), tx)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(participant.name, name("alice"));
        assert_eq!(participant.connection_id, connection_id);
        let participants = pusher.participants().await;
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].name, name("alice"));
    }

    #[tokio::test]
    async fn test_connect_with_duplicate_name_is_rejected() {
        // テスト項目: 使用中の名前での接続は NameTaken になり、参加者は増えない
        // given (前提条件):
        let (usecase, _repository, pusher) = create_usecase();
        let _alice = register(&*pusher, "alice").await;
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase
            .execute(ConnectionId::generate(), "alice".to_string(), tx)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::NameTaken("alice".to_string())));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Username already taken"
        );
        assert_eq!(pusher.participants().await.len(), 1);
    }

    #[tokio::test]
    async fn test_connect_with_empty_name_is_rejected() {
        // テスト項目: 空の名前での接続は InvalidName になる
        // given (前提条件):
        let (usecase, _repository, pusher) = create_usecase();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase
            .execute(ConnectionId::generate(), String::new(), tx)
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::InvalidName));
        assert!(pusher.participants().await.is_empty());
    }

    #[tokio::test]
    async fn test_connect_with_long_name_is_accepted() {
        // テスト項目: 空でなければ長い名前でも接続でき、参加者一覧にそのまま載る
        // given (前提条件):
        let (usecase, _repository, pusher) = create_usecase();
        let long_name = "x".repeat(200);
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase
            .execute(ConnectionId::generate(), long_name.clone(), tx)
            .await;

        // then (期待する結果):
        let participant = result.unwrap();
        assert_eq!(participant.name.as_str(), long_name);
        let names: Vec<_> = pusher
            .participants()
            .await
            .into_iter()
            .map(|p| p.name.into_string())
            .collect();
        assert_eq!(names, vec![long_name]);
    }

    #[tokio::test]
    async fn test_join_is_sent_to_other_connections_only() {
        // テスト項目: join は新しい接続以外の全接続に送られる
        // given (前提条件):
        let (usecase, _repository, pusher) = create_usecase();
        let (_alice_id, mut alice_rx) = register(&*pusher, "alice").await;
        let (tx, mut bob_rx) = mpsc::unbounded_channel();
        let bob = usecase
            .execute(ConnectionId::generate(), "bob".to_string(), tx)
            .await
            .unwrap();

        // when (操作):
        let evicted = usecase.broadcast_participant_joined(&bob).await;

        // then (期待する結果):
        assert!(evicted.is_empty());
        let frames = drain_json(&mut alice_rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(
            frames[0],
            serde_json::json!({"type": "join", "user": "bob", "users": ["alice", "bob"]})
        );
        assert!(drain_json(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_join_delivery_failure_evicts_recipient() {
        // テスト項目: join を送れなかった接続は削除され、leave が送られる
        // given (前提条件):
        let (usecase, _repository, pusher) = create_usecase();
        let (_alice_id, alice_rx) = register(&*pusher, "alice").await;
        drop(alice_rx);
        let (tx, mut bob_rx) = mpsc::unbounded_channel();
        let bob = usecase
            .execute(ConnectionId::generate(), "bob".to_string(), tx)
            .await
            .unwrap();

        // when (操作):
        let evicted = usecase.broadcast_participant_joined(&bob).await;

        // then (期待する結果):
        assert_eq!(evicted, vec![name("alice")]);
        let frames = drain_json(&mut bob_rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "leave");
        assert_eq!(frames[0]["user"], "alice");
    }

    #[tokio::test]
    async fn test_build_init_state_returns_board_and_participants() {
        // テスト項目: init 用の状態にボードの内容と参加者一覧が含まれる
        // given (前提条件):
        let (usecase, repository, pusher) = create_usecase();
        repository
            .put(EditRecord::shape("s1", "rect:10,10,50,50"))
            .await;
        repository.put(EditRecord::text("t1", "Hello")).await;
        let _bob = register(&*pusher, "bob").await;
        let _alice = register(&*pusher, "alice").await;

        // when (操作):
        let (board, participants) = usecase.build_init_state().await;

        // then (期待する結果):
        assert_eq!(board.shapes["s1"], "rect:10,10,50,50");
        assert_eq!(board.texts["t1"], "Hello");
        let names: Vec<&str> = participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }
}
