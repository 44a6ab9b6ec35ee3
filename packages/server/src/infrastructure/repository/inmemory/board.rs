//! InMemory Board Repository 実装
//!
//! ドメイン層が定義する BoardRepository trait の具体的な実装。
//! Board ドメインモデルを `tokio::sync::Mutex` で保護して保持します。
//!
//! ロックはマップの更新・スナップショットのコピーの間だけ保持し、
//! ネットワーク書き込みをまたいで保持することはありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Board, BoardRepository, EditRecord};

/// インメモリ Board Repository 実装
pub struct InMemoryBoardRepository {
    /// Board ドメインモデル
    board: Arc<Mutex<Board>>,
}

impl InMemoryBoardRepository {
    /// 新しい InMemoryBoardRepository を作成
    pub fn new(board: Arc<Mutex<Board>>) -> Self {
        Self { board }
    }
}

impl Default for InMemoryBoardRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(Board::new())))
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn put(&self, record: EditRecord) {
        let mut board = self.board.lock().await;
        board.put(record);
    }

    async fn get_all(&self) -> Board {
        let board = self.board.lock().await;
        board.clone()
    }

    async fn merge_from(&self, other: &Board) {
        let mut board = self.board.lock().await;
        board.merge(other);
    }
}
