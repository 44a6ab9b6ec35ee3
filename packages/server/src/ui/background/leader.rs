//! Durability scheduler with soft leader election.
//!
//! After a random delay the scheduler sets its own leader flag. Nothing is
//! exchanged with other instances, so two processes may both act as leader.
//! The leader writes the whole board to the durable store every flush
//! interval.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::usecase::FlushBoardUseCase;

pub struct DurabilityScheduler {
    flush_board_usecase: Arc<FlushBoardUseCase>,
    is_leader: AtomicBool,
    election_delay_ms: RangeInclusive<u64>,
    flush_interval: Duration,
}

impl DurabilityScheduler {
    pub fn new(
        flush_board_usecase: Arc<FlushBoardUseCase>,
        election_delay_ms: RangeInclusive<u64>,
        flush_interval: Duration,
    ) -> Self {
        Self {
            flush_board_usecase,
            is_leader: AtomicBool::new(false),
            election_delay_ms,
            flush_interval,
        }
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader.load(Ordering::SeqCst)
    }

    fn election_delay(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.election_delay_ms.clone());
        Duration::from_millis(ms)
    }

    /// Wait the election delay, then become leader.
    async fn elect(&self) {
        let delay = self.election_delay();
        time::sleep(delay).await;
        self.is_leader.store(true, Ordering::SeqCst);
        tracing::info!("Became durability leader after {:?}", delay);
    }

    async fn run(&self) {
        self.elect().await;

        let mut ticker = time::interval_at(
            Instant::now() + self.flush_interval,
            self.flush_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.is_leader() {
                continue;
            }
            let report = self.flush_board_usecase.execute().await;
            if report.failed > 0 {
                tracing::warn!(
                    "Flushed board: {} written, {} failed",
                    report.written,
                    report.failed
                );
            } else {
                tracing::debug!("Flushed board: {} written", report.written);
            }
        }
    }

    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }
}
