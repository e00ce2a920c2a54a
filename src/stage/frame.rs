//! # Frame loop.
//!
//! Drives the game at a fixed period:
//!
//! ```text
//! every frame_interval (missed frames are skipped, not bursted):
//!   tick_all() ─► stage.update() ─► stage.render(delta_secs)
//! until the CancellationToken is cancelled
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::stage::Stage;

/// Fixed-rate driver for a [`Stage`] and the processes of its supervisor.
pub struct FrameLoop {
    stage: Arc<Stage>,
    interval: Duration,
}

impl FrameLoop {
    /// Creates a loop running at the supervisor's [`Config::frame_interval`](crate::Config::frame_interval).
    pub fn new(stage: Arc<Stage>) -> Self {
        let interval = stage.supervisor().config().frame_interval_clamped();
        Self { stage, interval }
    }

    /// Overrides the frame period (min 1ms).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Frame period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs frames until `token` is cancelled; returns the number of frames run.
    pub async fn run(self, token: CancellationToken) -> u64 {
        let sup = Arc::clone(self.stage.supervisor());
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last = Instant::now();
        let mut frames = 0u64;
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                now = ticker.tick() => {
                    let delta = now.saturating_duration_since(last).as_secs_f32();
                    last = now;

                    sup.tick_all().await;
                    self.stage.update();
                    self.stage.render(delta);
                    frames += 1;
                }
            }
        }
        frames
    }

    /// Spawns [`run`](Self::run) on the supervisor's runtime.
    pub fn spawn(self, token: CancellationToken) -> JoinHandle<u64> {
        let runtime = self.stage.supervisor().runtime().clone();
        runtime.spawn(self.run(token))
    }
}
