//! PeerRelay trait 定義
//!
//! 他のサーバーインスタンスとのピアリンクへの更新転送のインターフェース。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, EditRecord};

/// ピアリンクの書き込みタスクへ渡す 1 行分の JSON
pub type PeerChannel = mpsc::UnboundedSender<String>;

/// PeerRelay trait
///
/// ピアの発見や再接続は行わない。転送先はその時点で接続中のピアのみ。
#[async_trait]
pub trait PeerRelay: Send + Sync {
    /// ピアリンクを登録
    async fn register_peer(&self, peer_id: ConnectionId, addr: String, sender: PeerChannel);

    /// ピアリンクを登録解除
    async fn unregister_peer(&self, peer_id: &ConnectionId);

    /// 全ピアにレコードを転送し、転送できたピア数を返す
    async fn forward(&self, record: &EditRecord) -> usize;

    /// 接続中のピア数
    async fn peer_count(&self) -> usize;
}
