//! ピアリンクへの転送の実装
//!
//! - `tcp`: 改行区切り JSON の TCP リンクへの転送

pub mod tcp;

pub use tcp::TcpPeerRelay;
