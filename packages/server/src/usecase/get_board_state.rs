//! UseCase: ボードの状態取得（デバッグ用）

use std::sync::Arc;

use crate::domain::{Board, BoardRepository};

/// ボード状態取得のユースケース
pub struct GetBoardStateUseCase {
    repository: Arc<dyn BoardRepository>,
}

impl GetBoardStateUseCase {
    pub fn new(repository: Arc<dyn BoardRepository>) -> Self {
        Self { repository }
    }

    /// 現在のボードのスナップショットを取得
    pub async fn execute(&self) -> Board {
        self.repository.get_all().await
    }
}
