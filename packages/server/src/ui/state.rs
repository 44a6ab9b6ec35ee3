//! Shared application state.

use std::sync::Arc;

use crate::domain::{BoardRepository, DurableStore, MessagePusher, PeerRelay};
use crate::usecase::{
    ApplyEditUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase, FlushBoardUseCase,
    GetBoardStateUseCase, GetUsersUseCase, KeepaliveUseCase, PERSIST_QUEUE_CAPACITY, PersistQueue,
    ReplicatePeerUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// ApplyEditUseCase（編集適用のユースケース）
    pub apply_edit_usecase: Arc<ApplyEditUseCase>,
    /// ReplicatePeerUseCase（ピアレプリケーションのユースケース）
    pub replicate_peer_usecase: Arc<ReplicatePeerUseCase>,
    /// KeepaliveUseCase（キープアライブのユースケース）
    pub keepalive_usecase: Arc<KeepaliveUseCase>,
    /// FlushBoardUseCase（定期フラッシュのユースケース）
    pub flush_board_usecase: Arc<FlushBoardUseCase>,
    /// GetBoardStateUseCase（ボード状態取得のユースケース）
    pub get_board_state_usecase: Arc<GetBoardStateUseCase>,
    /// GetUsersUseCase（参加者一覧取得のユースケース）
    pub get_users_usecase: Arc<GetUsersUseCase>,
}

impl AppState {
    /// Wire every usecase from the four shared components.
    ///
    /// Spawns the persist queue worker, so this must run inside a tokio runtime.
    pub fn new(
        repository: Arc<dyn BoardRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        durable_store: Arc<dyn DurableStore>,
        peer_relay: Arc<dyn PeerRelay>,
    ) -> Self {
        let persist_queue = Arc::new(PersistQueue::spawn(
            durable_store.clone(),
            PERSIST_QUEUE_CAPACITY,
        ));
        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                message_pusher.clone(),
            )),
            apply_edit_usecase: Arc::new(ApplyEditUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                persist_queue.clone(),
                peer_relay.clone(),
            )),
            replicate_peer_usecase: Arc::new(ReplicatePeerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                persist_queue,
                peer_relay,
            )),
            keepalive_usecase: Arc::new(KeepaliveUseCase::new(message_pusher.clone())),
            flush_board_usecase: Arc::new(FlushBoardUseCase::new(
                repository.clone(),
                durable_store,
            )),
            get_board_state_usecase: Arc::new(GetBoardStateUseCase::new(repository)),
            get_users_usecase: Arc::new(GetUsersUseCase::new(message_pusher)),
        }
    }
}
