//! Redis を使った Durable Store 実装
//!
//! ## 設計ノート
//!
//! 接続は最初のコマンド実行時に確立し、多重化接続をキャッシュして使い回します。
//! キャッシュのロックは参照と格納の間だけ保持し、接続処理中は保持しません。
//! 接続には `CONNECT_TIMEOUT` の上限があります。
//! コマンドが失敗した場合はキャッシュを破棄し、次回のコマンドで再接続します。
//! 同じコマンド内でのリトライは行いません。

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::Mutex;

use crate::domain::{DurableStore, DurableStoreError};

/// 接続確立の待ち時間の上限
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis Durable Store 実装
pub struct RedisDurableStore {
    client: redis::Client,
    /// キャッシュされた多重化接続（未接続なら `None`）
    connection: Mutex<Option<MultiplexedConnection>>,
}

impl RedisDurableStore {
    /// URL（例: `redis://127.0.0.1:6379`）からストアを作成
    ///
    /// URL の検証のみを行い、接続は確立しません。
    pub fn open(url: &str) -> Result<Self, DurableStoreError> {
        let client =
            redis::Client::open(url).map_err(|e| DurableStoreError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            connection: Mutex::new(None),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, DurableStoreError> {
        if let Some(connection) = self.connection.lock().await.as_ref() {
            return Ok(connection.clone());
        }

        // 同時に複数の接続が張られることはあるが、後から格納した方が残るだけ
        let connection =
            tokio::time::timeout(CONNECT_TIMEOUT, self.client.get_multiplexed_async_connection())
                .await
                .map_err(|_| DurableStoreError::Connection("connect timed out".to_string()))?
                .map_err(|e| DurableStoreError::Connection(e.to_string()))?;
        tracing::debug!("Connected to durable store");
        *self.connection.lock().await = Some(connection.clone());
        Ok(connection)
    }

    async fn reset_connection(&self) {
        let mut cached = self.connection.lock().await;
        *cached = None;
    }

    async fn command_failed(&self, error: redis::RedisError) -> DurableStoreError {
        self.reset_connection().await;
        DurableStoreError::Command(error.to_string())
    }
}

#[async_trait]
impl DurableStore for RedisDurableStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), DurableStoreError> {
        let mut connection = self.connection().await?;
        match connection.set::<_, _, ()>(key, value).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.command_failed(e).await),
        }
    }

    async fn list_keys(&self) -> Result<Vec<String>, DurableStoreError> {
        let mut connection = self.connection().await?;
        match connection.keys::<_, Vec<String>>("*").await {
            Ok(keys) => Ok(keys),
            Err(e) => Err(self.command_failed(e).await),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DurableStoreError> {
        let mut connection = self.connection().await?;
        match connection.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(e) => Err(self.command_failed(e).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_invalid_url() {
        // テスト項目: 不正な URL ではストアを作成できない
        // given (前提条件):
        let url = "not a redis url";

        // when (操作):
        let result = RedisDurableStore::open(url);

        // then (期待する結果):
        assert!(matches!(result, Err(DurableStoreError::Connection(_))));
    }

    #[test]
    fn test_open_does_not_connect() {
        // テスト項目: 有効な URL ならサーバーが起動していなくても作成できる（遅延接続）
        // given (前提条件):
        let url = "redis://127.0.0.1:1";

        // when (操作):
        let result = RedisDurableStore::open(url);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_without_blocking_other_calls() {
        // テスト項目: 接続できないストアへの書き込みは接続エラーで終わり、並行する呼び出しも待たされ続けない
        // given (前提条件):
        let store = RedisDurableStore::open("redis://127.0.0.1:1").unwrap();

        // when (操作):
        let (first, second) = tokio::time::timeout(
            CONNECT_TIMEOUT * 2,
            async { tokio::join!(store.set("s1", "rect"), store.list_keys()) },
        )
        .await
        .expect("calls should finish within the connect timeout");

        // then (期待する結果):
        assert!(matches!(first, Err(DurableStoreError::Connection(_))));
        assert!(matches!(second, Err(DurableStoreError::Connection(_))));
    }
}
