//! InMemory Durable Store 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DurableStore, DurableStoreError};

/// インメモリ Durable Store 実装
///
/// プロセス終了とともに内容は失われます。
#[derive(Default)]
pub struct InMemoryDurableStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期データを持つストアを作成
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// 現在の内容のコピーを取得
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl DurableStore for InMemoryDurableStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), DurableStoreError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>, DurableStoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.keys().cloned().collect())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DurableStoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }
}
