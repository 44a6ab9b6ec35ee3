//! UseCase: ボード全体の永続化（リーダーによる定期フラッシュ）

use std::sync::Arc;

use crate::domain::{BoardRepository, DurableStore};

use super::persist::persist_record;

/// 1 回のフラッシュの結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub written: usize,
    pub failed: usize,
}

/// ボード全体の永続化のユースケース
pub struct FlushBoardUseCase {
    repository: Arc<dyn BoardRepository>,
    durable_store: Arc<dyn DurableStore>,
}

impl FlushBoardUseCase {
    /// 新しい FlushBoardUseCase を作成
    pub fn new(repository: Arc<dyn BoardRepository>, durable_store: Arc<dyn DurableStore>) -> Self {
        Self {
            repository,
            durable_store,
        }
    }

    /// スナップショットの全レコードを書き込む
    ///
    /// 失敗したキーはログに記録するだけで、このフラッシュ内ではリトライしない。
    pub async fn execute(&self) -> FlushReport {
        let board = self.repository.get_all().await;
        let mut report = FlushReport::default();
        for record in board.records() {
            if persist_record(self.durable_store.as_ref(), &record).await {
                report.written += 1;
            } else {
                report.failed += 1;
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::MockDurableStore;
    use crate::domain::{DurableStoreError, EditRecord};
    use crate::infrastructure::{
        repository::InMemoryBoardRepository, store::InMemoryDurableStore,
    };

    #[tokio::test]
    async fn test_flush_writes_every_record() {
        // テスト項目: フラッシュで全レコードが永続化ストアに書き込まれる
        // given (前提条件):
        let repository = Arc::new(InMemoryBoardRepository::default());
        repository.put(EditRecord::shape("s1", "rect")).await;
        repository.put(EditRecord::shape("s2", "circle")).await;
        repository.put(EditRecord::text("t1", "Hi")).await;
        let store = Arc::new(InMemoryDurableStore::new());
        let usecase = FlushBoardUseCase::new(repository, store.clone());

        // when (操作):
        let report = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(report, FlushReport { written: 3, failed: 0 });
        let persisted = store.snapshot().await;
        assert_eq!(persisted.len(), 3);
        assert_eq!(persisted["s2"], "circle");
        assert_eq!(persisted["text:t1"], "Hi");
    }

    #[tokio::test]
    async fn test_flush_continues_after_failed_key() {
        // テスト項目: 一部のキーの書き込みに失敗しても残りのキーは書き込まれる
        // given (前提条件):
        let repository = Arc::new(InMemoryBoardRepository::default());
        repository.put(EditRecord::shape("bad", "x")).await;
        repository.put(EditRecord::shape("good", "y")).await;
        let mut store = MockDurableStore::new();
        store.expect_set().times(2).returning(|key, _| {
            if key == "bad" {
                Err(DurableStoreError::Command("READONLY".to_string()))
            } else {
                Ok(())
            }
        });
        let usecase = FlushBoardUseCase::new(repository, Arc::new(store));

        // when (操作):
        let report = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(report, FlushReport { written: 1, failed: 1 });
    }
}
