//! 永続化ストアへのベストエフォート書き込み
//!
//! 失敗はログに記録するだけで、リトライも呼び出し元への伝播も行わない。
//!
//! 編集経路では `PersistQueue` を使い、書き込みを専用タスクに任せる。
//! ストアが応答しなくても、リレーやピア転送、後続の編集は待たされない。
//! 書き込みは投入順に 1 件ずつ行うため、同じキーへの書き込み順は保たれる。

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::{DurableStore, EditRecord};

/// 書き込み待ちキューの容量
pub const PERSIST_QUEUE_CAPACITY: usize = 1024;

/// 1 レコードを書き込み、成功したかどうかを返す
pub(crate) async fn persist_record(store: &dyn DurableStore, record: &EditRecord) -> bool {
    let key = record.flat_key();
    match store.set(&key, &record.data).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to persist '{}' to durable store: {}", key, e);
            false
        }
    }
}

/// 永続化ストアへの書き込みキュー
///
/// キューが満杯のときはレコードを捨てて警告を出す。捨てたレコードは
/// 定期フラッシュで書き込まれる。
pub struct PersistQueue {
    sender: mpsc::Sender<EditRecord>,
}

impl PersistQueue {
    /// 書き込みタスクを起動してキューを作成
    ///
    /// tokio ランタイム内で呼び出す必要がある。
    pub fn spawn(store: Arc<dyn DurableStore>, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<EditRecord>(capacity);
        tokio::spawn(async move {
            while let Some(record) = receiver.recv().await {
                persist_record(store.as_ref(), &record).await;
            }
            tracing::debug!("Persist queue closed");
        });
        Self { sender }
    }

    /// レコードを書き込み待ちにする（待機しない）
    ///
    /// キューに入れられたら `true` を返す。
    pub fn enqueue(&self, record: EditRecord) -> bool {
        match self.sender.try_send(record) {
            Ok(()) => true,
            Err(TrySendError::Full(record)) => {
                tracing::warn!(
                    "Persist queue is full, skipping write of '{}'",
                    record.flat_key()
                );
                false
            }
            Err(TrySendError::Closed(record)) => {
                tracing::warn!(
                    "Persist queue is closed, skipping write of '{}'",
                    record.flat_key()
                );
                false
            }
        }
    }
}
