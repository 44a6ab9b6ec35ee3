//! Long-lived background tasks.

mod leader;
mod liveness;

pub use leader::DurabilityScheduler;
pub use liveness::spawn_liveness_monitor;
