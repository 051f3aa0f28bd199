//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and
//! Executor layers.

pub mod outcome;
pub mod render;
pub mod ui_events;

pub use outcome::{ExecutionEvent, Outcome};
pub use render::{RenderState, ResponseView};
pub use ui_events::UiEvent;
