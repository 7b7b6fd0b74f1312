use std::future::Future;
use std::time::Duration;

use game_types::RoundId;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Countdown task bound to one round. Dropping the timer cancels the task,
/// so a replaced timer can never deliver another tick.
#[derive(Debug)]
pub struct RoundTimer {
    round_id: RoundId,
    handle: JoinHandle<()>,
}

impl RoundTimer {
    /// Call `on_tick(round_id)` every `period`, starting one period from
    /// now, until it returns false.
    pub fn start<F, Fut>(round_id: RoundId, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(RoundId) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if !on_tick(round_id).await {
                    break;
                }
            }
            tracing::debug!("Timer for round {} stopped", round_id);
        });

        Self { round_id, handle }
    }

    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
