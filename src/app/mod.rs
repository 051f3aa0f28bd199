//! App layer - central state management and command processing
//!
//! The App actor receives UI events and execution outcomes, updates
//! state, and emits render snapshots.

pub mod actor;
pub mod commands;
pub mod state;

pub use actor::AppActor;
pub use state::AppState;
