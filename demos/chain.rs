//! # Example: chain
//!
//! A cut-scene built from chained processes: `fade-in` → `dialogue` → `fade-out`.
//!
//! Shows how to:
//! - Implement [`Process`] with a [`Process::successor`].
//! - Attach a completion callback with [`ProcessSpec::with_on_complete`].
//! - Drive processes with [`Supervisor::tick_all`] and wait for the whole chain with [`Supervisor::drain`].
//!
//! ## Flow
//! ```text
//! run(fade-in) ──► tick ×N ──► Ok(false) ──► cleanup ──► successor(dialogue) ──► deregister fade-in
//!                                                          └─► dialogue ... ──► fade-out ... ──► registry empty
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example chain
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use procvisor::{
    Config, LogWriter, Process, ProcessError, ProcessRef, ProcessSpec, Subscribe, Supervisor,
};

/// Runs for a fixed number of frames, then hands over to `next`.
struct Step {
    name: &'static str,
    frames: u32,
    done: AtomicU32,
    next: Option<fn() -> ProcessRef>,
}

impl Step {
    fn arc(name: &'static str, frames: u32, next: Option<fn() -> ProcessRef>) -> ProcessRef {
        Arc::new(Self {
            name,
            frames,
            done: AtomicU32::new(0),
            next,
        })
    }
}

#[async_trait]
impl Process for Step {
    fn name(&self) -> &str {
        self.name
    }

    fn init(&self) -> Result<(), ProcessError> {
        println!("[{}] start ({} frames)", self.name, self.frames);
        Ok(())
    }

    async fn tick(&self) -> Result<bool, ProcessError> {
        let frame = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        println!("[{}] frame {frame}/{}", self.name, self.frames);
        Ok(frame < self.frames)
    }

    async fn cleanup(&self) {
        println!("[{}] cleanup", self.name);
    }

    fn successor(&self) -> Option<ProcessSpec> {
        self.next.map(|make| ProcessSpec::new(make()))
    }
}

fn fade_out() -> ProcessRef {
    Step::arc("fade-out", 2, None)
}

fn dialogue() -> ProcessRef {
    Step::arc("dialogue", 3, Some(fade_out))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::verbose())];
    let sup = Supervisor::builder(Config {
        stderr_diagnostics: false,
        ..Config::default()
    })
    .with_subscribers(subs)
    .build();

    let intro = ProcessSpec::new(Step::arc("fade-in", 2, Some(dialogue)))
        .with_on_complete(|| println!("[fade-in] complete"));
    anyhow::ensure!(sup.run(intro), "fade-in did not start");

    while sup.live_count() > 0 {
        sup.tick_all().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    sup.drain_within(Duration::from_secs(1)).await?;
    sup.shutdown().await?;
    println!("cut-scene finished");
    Ok(())
}
