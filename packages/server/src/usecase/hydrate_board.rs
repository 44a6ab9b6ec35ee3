//! UseCase: 起動時のボードの復元
//!
//! 永続化ストアの全キーを読み込み、共有ステートストアにマージする。
//! `shape:` で始まるキーは図形、`text:` で始まるキーはテキスト、それ以外は図形として扱う。

use std::sync::Arc;

use crate::domain::{Board, BoardRepository, DurableStore, EditRecord, ObjectKind};

/// ボード復元のユースケース
pub struct HydrateBoardUseCase {
    repository: Arc<dyn BoardRepository>,
    durable_store: Arc<dyn DurableStore>,
}

impl HydrateBoardUseCase {
    /// 新しい HydrateBoardUseCase を作成
    pub fn new(repository: Arc<dyn BoardRepository>, durable_store: Arc<dyn DurableStore>) -> Self {
        Self {
            repository,
            durable_store,
        }
    }

    /// 永続化ストアからボードを復元し、読み込んだレコード数を返す
    ///
    /// キー一覧の取得に失敗した場合は空のボードのまま起動を続ける。
    /// 個々のキーの取得に失敗した場合はそのキーだけをスキップする。
    pub async fn execute(&self) -> usize {
        let keys = match self.durable_store.list_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Failed to list durable keys, starting with an empty board: {}", e);
                return 0;
            }
        };

        let mut board = Board::new();
        for key in keys {
            match self.durable_store.get(&key).await {
                Ok(Some(data)) => {
                    let (kind, id) = ObjectKind::split_flat_key(&key);
                    board.put(EditRecord::new(kind, id, data));
                }
                Ok(None) => {
                    tracing::debug!("Durable key '{}' disappeared during hydration", key);
                }
                Err(e) => {
                    tracing::warn!("Failed to load durable key '{}': {}", key, e);
                }
            }
        }

        let loaded = board.len();
        self.repository.merge_from(&board).await;
        tracing::info!(
            "Hydrated {} shape(s) and {} text(s) from durable store",
            board.shapes.len(),
            board.texts.len()
        );
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DurableStoreError;
    use crate::domain::store::MockDurableStore;
    use crate::infrastructure::{
        repository::InMemoryBoardRepository, store::InMemoryDurableStore,
    };
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_hydrate_routes_text_keys_to_text_map() {
        // テスト項目: text: で始まるキーはテキスト、それ以外は図形として復元される
        // given (前提条件):
        let repository = Arc::new(InMemoryBoardRepository::default());
        let store = Arc::new(InMemoryDurableStore::with_entries(HashMap::from([
            ("s1".to_string(), "rect:10,10,50,50".to_string()),
            ("text:t1".to_string(), "Hello".to_string()),
        ])));
        let usecase = HydrateBoardUseCase::new(repository.clone(), store);

        // when (操作):
        let loaded = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(loaded, 2);
        let board = repository.get_all().await;
        assert_eq!(board.shapes["s1"], "rect:10,10,50,50");
        assert_eq!(board.texts["t1"], "Hello");
        assert!(!board.shapes.contains_key("text:t1"));
    }

    #[tokio::test]
    async fn test_hydrate_restores_escaped_shape_keys_as_shapes() {
        // テスト項目: shape: で始まるキーは、ID が text: で始まる図形として復元される
        // given (前提条件):
        let repository = Arc::new(InMemoryBoardRepository::default());
        let store = Arc::new(InMemoryDurableStore::with_entries(HashMap::from([
            ("shape:text:abc".to_string(), "rect".to_string()),
            ("text:abc".to_string(), "Hi".to_string()),
        ])));
        let usecase = HydrateBoardUseCase::new(repository.clone(), store);

        // when (操作):
        let loaded = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(loaded, 2);
        let board = repository.get_all().await;
        assert_eq!(board.shapes["text:abc"], "rect");
        assert_eq!(board.texts["abc"], "Hi");
    }

    #[tokio::test]
    async fn test_hydrate_starts_empty_when_store_is_unreachable() {
        // テスト項目: キー一覧の取得に失敗しても空のボードで起動を続ける
        // given (前提条件):
        let repository = Arc::new(InMemoryBoardRepository::default());
        let mut store = MockDurableStore::new();
        store
            .expect_list_keys()
            .times(1)
            .returning(|| Err(DurableStoreError::Connection("refused".to_string())));
        store.expect_get().never();
        let usecase = HydrateBoardUseCase::new(repository.clone(), Arc::new(store));

        // when (操作):
        let loaded = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(loaded, 0);
        assert!(repository.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_skips_keys_that_fail_to_load() {
        // テスト項目: 取得に失敗したキーだけがスキップされる
        // given (前提条件):
        let repository = Arc::new(InMemoryBoardRepository::default());
        let mut store = MockDurableStore::new();
        store
            .expect_list_keys()
            .returning(|| Ok(vec!["s1".to_string(), "s2".to_string(), "s3".to_string()]));
        store.expect_get().returning(|key| match key {
            "s1" => Ok(Some("rect".to_string())),
            "s2" => Err(DurableStoreError::Command("WRONGTYPE".to_string())),
            _ => Ok(None),
        });
        let usecase = HydrateBoardUseCase::new(repository.clone(), Arc::new(store));

        // when (操作):
        let loaded = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(loaded, 1);
        let board = repository.get_all().await;
        assert_eq!(board.shapes.len(), 1);
        assert_eq!(board.shapes["s1"], "rect");
    }
}
