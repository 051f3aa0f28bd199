//! # Courier TUI
//!
//! A terminal HTTP request workbench, similar to Postman/Insomnia.
//!
//! ## Features
//! - HTTP methods: GET, POST, PUT, PATCH, DELETE
//! - Request body modes: raw text, form fields, file payload
//! - Custom headers with name completion
//! - Request history and saved collections
//! - Environment variable switching ({{var}} substitution)
//! - Persisted pane layout
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Executor (Tokio runtime) - one task per send, one terminal outcome

pub mod app;
pub mod builder;
pub mod completion;
pub mod config;
pub mod constants;
pub mod executor;
pub mod messages;
pub mod models;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use builder::{BodyMode, InvalidRequest, RequestDraft};
pub use config::UiConfig;
pub use executor::{ExecutionHandle, Executor, HttpTransport, Transport, TransportError};
pub use messages::{ExecutionEvent, Outcome, RenderState, UiEvent};
pub use models::{Collection, Environment, HttpMethod, RequestBody, RequestSpec, ResponseData};
pub use storage::Storage;
