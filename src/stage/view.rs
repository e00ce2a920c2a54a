//! # Views attached to the current game state.
//!
//! A view that needs its state takes a [`StateRef`](crate::StateRef) in its
//! own constructor:
//!
//! ```rust
//! use procvisor::{GameState, StateRef, View};
//!
//! struct Level;
//! impl GameState for Level {}
//!
//! struct Hud {
//!     level: StateRef,
//! }
//!
//! impl View for Hud {
//!     fn render(&self, _delta: f32) {
//!         let _ = self.level.name();
//!     }
//! }
//! ```

use std::sync::Arc;

/// Shared handle to a view.
pub type ViewRef = Arc<dyn View>;

/// Presentation layer bound to one game state; dropped with it.
pub trait View: Send + Sync + 'static {
    /// Called once after the state it belongs to was initialized.
    fn init(&self) {}

    /// Called once per frame after the state rendered.
    fn render(&self, _delta: f32) {}

    /// Called once when its state is replaced.
    fn cleanup(&self) {}
}
