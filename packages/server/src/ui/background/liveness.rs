//! Liveness monitor: pings every connection at a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::usecase::KeepaliveUseCase;

/// Spawn the monitor. The first ping goes out one `period` after startup.
pub fn spawn_liveness_monitor(usecase: Arc<KeepaliveUseCase>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let evicted = usecase.execute().await;
            if !evicted.is_empty() {
                tracing::info!("Liveness check removed {} connection(s)", evicted.len());
            }
        }
    })
}
