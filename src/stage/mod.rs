//! Game-state holder: states, views and the frame loop.
//!
//! ## Contents
//! - [`GameState`], [`StateRef`] the current game mode
//! - [`View`], [`ViewRef`] presentation attached to a state
//! - [`Stage`] holder whose transitions wait for the process registry to drain
//! - [`FrameLoop`] fixed-rate driver ticking processes and rendering the stage

mod frame;
mod holder;
mod state;
mod view;

pub use frame::FrameLoop;
pub use holder::Stage;
pub use state::{GameState, StateRef};
pub use view::{View, ViewRef};
