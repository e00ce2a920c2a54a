//! # Stage: holder of the current game state.
//!
//! The stage couples state swaps to the process registry: a new state is only
//! installed once no process is left running.
//!
//! ```text
//! transition_deferred(s, views) ──► spawn { drain() ─► swap }       (caller continues)
//! transition_now(s, views)      ──► stop_all() ─► drain() ─► swap   (caller awaits)
//!
//! swap:
//!   old.cleanup() ─► old views cleanup() ─► new.init() ─► new views init() ─► install
//!   ─► publish StateSwapped
//! ```
//!
//! ## Rules
//! - Swaps are serialized: a second swap waits until the first one has
//!   installed its state, so every replaced state is cleaned up exactly once.
//! - Callbacks run without the scene lock held; while a swap is in progress
//!   [`Stage::current`] is `None` and frames render nothing.
//! - A chain hand-off never lets the drain finish early (see
//!   [`Supervisor::drain`]).

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::core::Supervisor;
use crate::events::{Event, EventKind};
use crate::stage::{StateRef, ViewRef};

#[derive(Default)]
struct Scene {
    state: Option<StateRef>,
    views: Vec<ViewRef>,
}

/// Current game state plus its views.
pub struct Stage {
    sup: Arc<Supervisor>,
    scene: Mutex<Scene>,
    // Held for the whole of `swap`; `scene` is only locked around take/install.
    swapping: Mutex<()>,
}

impl Stage {
    /// Creates an empty stage bound to `sup`.
    pub fn new(sup: Arc<Supervisor>) -> Arc<Self> {
        Arc::new(Self {
            sup,
            scene: Mutex::new(Scene::default()),
            swapping: Mutex::new(()),
        })
    }

    /// Supervisor whose registry gates the transitions.
    pub fn supervisor(&self) -> &Arc<Supervisor> {
        &self.sup
    }

    /// Currently installed state, if any.
    pub fn current(&self) -> Option<StateRef> {
        self.scene.lock().state.clone()
    }

    /// Swaps to `state` once every process has finished, without blocking the caller.
    pub fn transition_deferred(self: &Arc<Self>, state: StateRef, views: Vec<ViewRef>) -> JoinHandle<()> {
        let stage = Arc::clone(self);
        self.sup.runtime().spawn(async move {
            stage.sup.drain().await;
            stage.swap(state, views, "deferred");
        })
    }

    /// Stops every process, waits for the registry to drain, then swaps to `state`.
    pub async fn transition_now(&self, state: StateRef, views: Vec<ViewRef>) {
        self.sup.stop_all().await;
        self.sup.drain().await;
        self.swap(state, views, "immediate");
    }

    /// Forwards one update to the current state.
    pub fn update(&self) {
        if let Some(state) = self.current() {
            state.update();
        }
    }

    /// Renders the current state, then its views in attach order.
    pub fn render(&self, delta: f32) {
        let (state, views) = {
            let scene = self.scene.lock();
            (scene.state.clone(), scene.views.clone())
        };
        if let Some(state) = state {
            state.render(delta);
        }
        for view in &views {
            view.render(delta);
        }
    }

    fn swap(&self, state: StateRef, views: Vec<ViewRef>, mode: &'static str) {
        let _swapping = self.swapping.lock();
        let old = std::mem::take(&mut *self.scene.lock());
        if let Some(old_state) = &old.state {
            old_state.cleanup();
        }
        for view in &old.views {
            view.cleanup();
        }

        state.init();
        for view in &views {
            view.init();
        }

        let name = state.name().to_string();
        *self.scene.lock() = Scene {
            state: Some(state),
            views,
        };
        self.sup.bus().publish(
            Event::new(EventKind::StateSwapped)
                .with_process(name)
                .with_reason(mode),
        );
    }
}
