//! # Game state capability.
//!
//! Exactly one [`GameState`] is current at a time. It is replaced through
//! [`Stage::transition_deferred`](crate::Stage::transition_deferred) or
//! [`Stage::transition_now`](crate::Stage::transition_now), both of which wait
//! for every process to leave the registry first.

use std::sync::Arc;

/// Shared handle to a game state.
pub type StateRef = Arc<dyn GameState>;

/// A global game mode (menu, level, pause screen, ...).
///
/// Every method defaults to a no-op so a state only implements what it uses.
pub trait GameState: Send + Sync + 'static {
    /// Name used in events.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once when the state becomes current.
    fn init(&self) {}

    /// Called once per frame.
    fn update(&self) {}

    /// Called once per frame with the elapsed frame time in seconds.
    fn render(&self, _delta: f32) {}

    /// Called once when another state replaces this one.
    fn cleanup(&self) {}
}
