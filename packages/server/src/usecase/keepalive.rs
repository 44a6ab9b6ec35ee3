//! UseCase: キープアライブ
//!
//! 全接続に ping を送り、送信できなかった接続を削除する。

use std::sync::Arc;

use crate::domain::{MessagePusher, UserName};

use super::disconnect_participant::evict_connections;

/// キープアライブのユースケース
pub struct KeepaliveUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl KeepaliveUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 1 回分の ping を実行し、削除された参加者名を返す
    pub async fn execute(&self) -> Vec<UserName> {
        let failed = self.message_pusher.ping_all().await;
        evict_connections(self.message_pusher.as_ref(), failed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutboundFrame;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::usecase::test_support::{drain, name, register};

    #[tokio::test]
    async fn test_ping_reaches_every_connection() {
        // テスト項目: 全接続に Ping が送られ、誰も削除されない
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = KeepaliveUseCase::new(pusher.clone());
        let (_alice_id, mut alice_rx) = register(&*pusher, "alice").await;
        let (_bob_id, mut bob_rx) = register(&*pusher, "bob").await;

        // when (操作):
        let evicted = usecase.execute().await;

        // then (期待する結果):
        assert!(evicted.is_empty());
        assert_eq!(drain(&mut alice_rx), vec![OutboundFrame::Ping]);
        assert_eq!(drain(&mut bob_rx), vec![OutboundFrame::Ping]);
    }

    #[tokio::test]
    async fn test_dead_connection_is_evicted_with_leave() {
        // テスト項目: ping を送れなかった接続は削除され、残りの接続に leave が届く
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = KeepaliveUseCase::new(pusher.clone());
        let (_alice_id, mut alice_rx) = register(&*pusher, "alice").await;
        let (_bob_id, bob_rx) = register(&*pusher, "bob").await;
        drop(bob_rx);

        // when (操作):
        let evicted = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(evicted, vec![name("bob")]);
        let frames = drain(&mut alice_rx);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], OutboundFrame::Ping);
        assert!(matches!(&frames[1], OutboundFrame::Text(text) if text.contains("\"leave\"")));
        assert_eq!(pusher.participants().await.len(), 1);
    }
}
