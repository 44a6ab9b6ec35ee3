//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Board, EditRecord};

/// Board Repository trait
///
/// 図形・テキストを保持する共有ステートストアへのインターフェース。
/// 実装は自身の排他ロックを持ち、ロックはマップの更新またはスナップショットの
/// コピーの間だけ保持すること。
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// レコードを挿入または上書き（常に成功する）
    async fn put(&self, record: EditRecord);

    /// 全レコードの値コピーを取得（ライブなマップは公開しない）
    async fn get_all(&self) -> Board;

    /// `other` の全レコードを ID ごとに `put` と同等に適用
    ///
    /// 競合時は後からロックを取得した書き込みが勝つ（因果順序ではない）。
    async fn merge_from(&self, other: &Board);
}
