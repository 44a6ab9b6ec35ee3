//! Domain layer: entities, value objects and the interfaces the usecases
//! depend on. Concrete implementations live in the infrastructure layer.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod peer_relay;
pub mod repository;
pub mod store;
pub mod value_object;

pub use entity::{Board, EditRecord, Participant, PresenceEvent, PresenceKind};
pub use error::{DurableStoreError, MessagePushError, ValueObjectError};
pub use message_pusher::{MessagePusher, OutboundFrame, PusherChannel};
pub use peer_relay::{PeerChannel, PeerRelay};
pub use repository::BoardRepository;
pub use store::DurableStore;
pub use value_object::{ConnectionId, ObjectKind, Timestamp, UserName};
