//! UseCase layer: the application operations, written against the domain
//! traits only.

mod apply_edit;
mod connect_participant;
mod disconnect_participant;
mod error;
mod flush_board;
mod get_board_state;
mod get_users;
mod hydrate_board;
mod keepalive;
mod persist;
mod replicate_peer;

pub use apply_edit::{ApplyEditUseCase, EditOutcome};
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, PeerError};
pub use flush_board::{FlushBoardUseCase, FlushReport};
pub use get_board_state::GetBoardStateUseCase;
pub use get_users::GetUsersUseCase;
pub use hydrate_board::HydrateBoardUseCase;
pub use keepalive::KeepaliveUseCase;
pub use persist::{PERSIST_QUEUE_CAPACITY, PersistQueue};
pub use replicate_peer::ReplicatePeerUseCase;
