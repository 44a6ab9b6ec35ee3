//! TCP ピアリンクを使った PeerRelay 実装
//!
//! ## 責務
//!
//! - 接続中のピアリンクの書き込みチャンネルを管理
//! - レコードを改行区切り JSON にエンコードして全ピアに転送
//!
//! ソケットの読み書きは UI 層（`ui/handler/peer.rs`）が行います。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EditRecord, PeerChannel, PeerRelay};
use crate::infrastructure::dto::peer::{PeerRecord, encode_line};

struct PeerEntry {
    addr: String,
    sender: PeerChannel,
}

/// TCP ピアリンクを使った PeerRelay 実装
#[derive(Default)]
pub struct TcpPeerRelay {
    peers: Mutex<HashMap<ConnectionId, PeerEntry>>,
}

impl TcpPeerRelay {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PeerRelay for TcpPeerRelay {
    async fn register_peer(&self, peer_id: ConnectionId, addr: String, sender: PeerChannel) {
        let mut peers = self.peers.lock().await;
        tracing::debug!("Peer {} ({}) registered to PeerRelay", addr, peer_id);
        peers.insert(peer_id, PeerEntry { addr, sender });
    }

    async fn unregister_peer(&self, peer_id: &ConnectionId) {
        let mut peers = self.peers.lock().await;
        if let Some(entry) = peers.remove(peer_id) {
            tracing::debug!("Peer {} ({}) unregistered from PeerRelay", entry.addr, peer_id);
        }
    }

    async fn forward(&self, record: &EditRecord) -> usize {
        let line = match encode_line(&PeerRecord::from(record)) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to encode peer record '{}': {}", record.id, e);
                return 0;
            }
        };

        let targets: Vec<(ConnectionId, String, PeerChannel)> = {
            let peers = self.peers.lock().await;
            peers
                .iter()
                .map(|(id, entry)| (*id, entry.addr.clone(), entry.sender.clone()))
                .collect()
        };

        let mut forwarded = 0;
        for (peer_id, addr, sender) in targets {
            if sender.send(line.clone()).is_ok() {
                forwarded += 1;
            } else {
                // 書き込みタスクが終了している。リンクの終了処理で登録解除される
                tracing::warn!("Failed to forward record to peer {} ({})", addr, peer_id);
            }
        }
        forwarded
    }

    async fn peer_count(&self) -> usize {
        self.peers.lock().await.len()
    }
}
