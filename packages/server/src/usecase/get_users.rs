//! UseCase: 接続中の参加者一覧の取得

use std::sync::Arc;

use crate::domain::{MessagePusher, Participant};

/// 参加者一覧取得のユースケース
pub struct GetUsersUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetUsersUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続中の参加者一覧（名前順）を取得
    pub async fn execute(&self) -> Vec<Participant> {
        self.message_pusher.participants().await
    }
}
