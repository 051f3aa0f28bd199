//! Execution outcomes - delivery contract between the executor and the app
//!
//! The executor task sends exactly one `ExecutionEvent` per handle over an
//! unbounded channel. The app actor is the only consumer, so response and
//! history state is never touched from a background task.

use std::sync::Arc;
use std::time::Duration;

use crate::executor::TransportError;
use crate::models::{RequestSpec, ResponseData};

/// One terminal event per execution handle
#[derive(Debug)]
pub struct ExecutionEvent {
    pub id: u64,
    pub outcome: Outcome,
}

/// The three disjoint ways a request run ends.
///
/// A handle produces exactly one of these, never more; a failure is never
/// reported as a cancellation and vice versa.
#[derive(Debug)]
pub enum Outcome {
    /// The transport returned a response. Carries the originating request
    /// so consumers can correlate results when several runs overlap.
    Completed {
        response: ResponseData,
        request: Arc<RequestSpec>,
    },
    /// The transport failed (connect, DNS, timeout, body read)
    Failed {
        error: TransportError,
        elapsed: Duration,
    },
    /// `stop()` was requested before the call resolved
    Cancelled,
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Completed { .. } => "completed",
            Outcome::Failed { .. } => "failed",
            Outcome::Cancelled => "cancelled",
        }
    }
}
