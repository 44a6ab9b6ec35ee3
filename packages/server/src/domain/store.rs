//! Durable store trait 定義
//!
//! 外部のキーバリューストアへのアダプタのインターフェース。
//! ロジックは持たず、トランスポートのみを担当します。

use async_trait::async_trait;

use super::DurableStoreError;

/// Durable Store trait
///
/// キーはオブジェクト ID（テキストは `text:` プレフィックス付き）、値はシリアライズ済みの内容。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// 1 つのキーを無条件に書き込む
    async fn set(&self, key: &str, value: &str) -> Result<(), DurableStoreError>;

    /// 全キーを取得
    async fn list_keys(&self) -> Result<Vec<String>, DurableStoreError>;

    /// 1 つのキーの値を取得（存在しない場合は `None`）
    async fn get(&self, key: &str) -> Result<Option<String>, DurableStoreError>;
}
