//! Durable store 実装
//!
//! - `redis`: Redis を使った実装（複数インスタンスで共有される）
//! - `inmemory`: プロセス内の HashMap を使った実装（テスト・ストアなしでの起動用）

pub mod inmemory;
pub mod redis;

pub use self::inmemory::InMemoryDurableStore;
pub use self::redis::RedisDurableStore;
