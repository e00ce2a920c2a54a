//! # Example: state_swap
//!
//! A menu state that hands over to a level once its processes are gone.
//!
//! Shows how to:
//! - Implement [`GameState`] and a [`View`] holding an explicit [`StateRef`].
//! - Run a [`FrameLoop`] that ticks processes, updates and renders the [`Stage`].
//! - Swap states with [`Stage::transition_deferred`] and [`Stage::transition_now`].
//!
//! ## Flow
//! ```text
//! transition_now(menu)
//! run(blinker) ─► FrameLoop ticks it until it stops on its own
//! transition_deferred(level) ─► waits for blinker ─► menu.cleanup ─► level.init
//! run(enemy)  ─► transition_now(credits) ─► Quit enemy ─► level.cleanup ─► credits.init
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example state_swap
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use procvisor::{
    Config, FrameLoop, GameState, LogWriter, ProcessError, ProcessFn, ProcessRef, Stage, StateRef,
    Subscribe, Supervisor, View, ViewRef,
};
use tokio_util::sync::CancellationToken;

struct Named(&'static str);

impl GameState for Named {
    fn name(&self) -> &str {
        self.0
    }
    fn init(&self) {
        println!("[state] {} init", self.0);
    }
    fn cleanup(&self) {
        println!("[state] {} cleanup", self.0);
    }
}

/// Prints the state it belongs to once in a while.
struct Hud {
    state: StateRef,
    frames: AtomicU32,
}

impl View for Hud {
    fn render(&self, delta: f32) {
        if self.frames.fetch_add(1, Ordering::Relaxed) % 10 == 0 {
            println!("[hud] {} (dt={delta:.3}s)", self.state.name());
        }
    }
}

fn counted(name: &'static str, limit: u32) -> ProcessRef {
    let ticks = Arc::new(AtomicU32::new(0));
    ProcessFn::arc(name, move || {
        let ticks = ticks.clone();
        async move { Ok::<_, ProcessError>(ticks.fetch_add(1, Ordering::SeqCst) + 1 < limit) }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::verbose())];
    let sup = Supervisor::builder(Config {
        frame_interval: Duration::from_millis(20),
        ..Config::default()
    })
    .with_subscribers(subs)
    .build();

    let stage = Stage::new(sup.clone());
    let frames = CancellationToken::new();
    let frame_loop = FrameLoop::new(stage.clone()).spawn(frames.clone());

    let menu: StateRef = Arc::new(Named("menu"));
    stage.transition_now(menu, vec![]).await;

    anyhow::ensure!(sup.run(counted("blinker", 5)), "blinker did not start");
    let level: StateRef = Arc::new(Named("level"));
    let hud: ViewRef = Arc::new(Hud {
        state: level.clone(),
        frames: AtomicU32::new(0),
    });
    stage.transition_deferred(level, vec![hud]).await?;

    anyhow::ensure!(sup.run(counted("enemy", u32::MAX)), "enemy did not start");
    tokio::time::sleep(Duration::from_millis(300)).await;
    stage
        .transition_now(Arc::new(Named("credits")), vec![])
        .await;

    frames.cancel();
    let rendered = frame_loop.await?;
    println!("rendered {rendered} frames");

    sup.shutdown().await?;
    Ok(())
}
