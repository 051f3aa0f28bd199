//! Request executor - one background task per send, one terminal outcome
//!
//! `start` validates the request, spawns a tokio task that performs a
//! single transport call, and returns a handle. The task delivers exactly
//! one `ExecutionEvent` on the outcome channel: `Completed`, `Failed` or
//! `Cancelled`. Cancellation wins races against completion (biased
//! select), and `stop` after a terminal event is a no-op.

pub mod transport;

pub use transport::{HttpTransport, Transport, TransportError};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::builder::InvalidRequest;
use crate::messages::{ExecutionEvent, Outcome};
use crate::models::RequestSpec;

/// Token for one in-flight (or finished) request run.
///
/// Dropping the handle without calling `stop` also aborts the run; the
/// app holds the handle until a terminal event arrives.
pub struct ExecutionHandle {
    id: u64,
    cancel_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ExecutionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Request cancellation. Idempotent; has no effect once the run has
    /// reached a terminal state.
    pub fn stop(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns request runs and assigns their ids
pub struct Executor {
    transport: Arc<dyn Transport>,
    event_tx: mpsc::UnboundedSender<ExecutionEvent>,
    next_id: AtomicU64,
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>, event_tx: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
        Executor {
            transport,
            event_tx,
            next_id: AtomicU64::new(1),
        }
    }

    /// Begin executing a request on its own task.
    ///
    /// Rejects malformed requests synchronously, before any network
    /// activity. Concurrent runs are allowed; each handle's outcome is
    /// independent.
    pub fn start(&self, request: RequestSpec) -> Result<ExecutionHandle, InvalidRequest> {
        if request.target.trim().is_empty() {
            return Err(InvalidRequest::EmptyTarget);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let transport = Arc::clone(&self.transport);
        let event_tx = self.event_tx.clone();
        let request = Arc::new(request);

        let task = tokio::spawn(async move {
            tracing::info!(id, method = request.method.as_str(), url = %request.url(), "executing request");
            let start = Instant::now();

            let outcome = tokio::select! {
                biased;

                _ = cancel_rx => {
                    tracing::info!(id, "request cancelled");
                    Outcome::Cancelled
                }
                result = transport.send(&request) => match result {
                    Ok(response) => {
                        tracing::info!(id, status = response.status, elapsed_ms = response.elapsed_ms(), "request completed");
                        Outcome::Completed {
                            response,
                            request: Arc::clone(&request),
                        }
                    }
                    Err(error) => {
                        tracing::warn!(id, error = %error, "request failed");
                        Outcome::Failed {
                            error,
                            elapsed: start.elapsed(),
                        }
                    }
                }
            };

            let _ = event_tx.send(ExecutionEvent { id, outcome });
        });

        Ok(ExecutionHandle {
            id,
            cancel_tx: Some(cancel_tx),
            task,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HttpMethod, RequestBody, ResponseData, Scheme};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    struct MockTransport {
        results: Mutex<VecDeque<Result<ResponseData, TransportError>>>,
        calls: AtomicUsize,
        hang: bool,
    }

    impl MockTransport {
        fn returning(results: Vec<Result<ResponseData, TransportError>>) -> Arc<Self> {
            Arc::new(MockTransport {
                results: Mutex::new(results.into()),
                calls: AtomicUsize::new(0),
                hang: false,
            })
        }

        fn hanging() -> Arc<Self> {
            Arc::new(MockTransport {
                results: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
                hang: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, _request: &RequestSpec) -> Result<ResponseData, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Http(String::from("mock exhausted"))))
        }
    }

    fn spec(target: &str) -> RequestSpec {
        RequestSpec {
            method: HttpMethod::GET,
            scheme: Scheme::Https,
            target: target.to_string(),
            headers: HashMap::new(),
            body: RequestBody::Empty,
            context: HashMap::new(),
            date: chrono::Utc::now().date_naive(),
        }
    }

    fn response(status: u16, body: &str, ms: u64) -> ResponseData {
        ResponseData {
            status,
            headers: Vec::new(),
            body: body.to_string(),
            elapsed: Duration::from_millis(ms),
        }
    }

    #[tokio::test]
    async fn test_completion_pairs_response_with_original_request() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockTransport::returning(vec![Ok(response(200, r#"{"ok":true}"#, 120))]);
        let executor = Executor::new(mock.clone(), tx);

        let sent = spec("api.example.com/users");
        let expected = sent.clone();
        let handle = executor.start(sent).unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.id, handle.id());
        match event.outcome {
            Outcome::Completed { response, request } => {
                assert_eq!(response.status, 200);
                assert_eq!(response.body, r#"{"ok":true}"#);
                assert_eq!(response.elapsed, Duration::from_millis(120));
                assert_eq!(*request, expected);
            }
            other => panic!("expected Completed, got {:?}", other.kind()),
        }

        // Exactly one delivery per handle
        assert!(rx.try_recv().is_err());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_stop_before_resolution_yields_only_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockTransport::hanging();
        let executor = Executor::new(mock.clone(), tx);

        let mut handle = executor.start(spec("api.example.com/slow")).unwrap();
        handle.stop();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.id, handle.id());
        assert!(matches!(event.outcome, Outcome::Cancelled));

        // No completion sneaks out after the cancellation
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_and_noop_after_completion() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockTransport::returning(vec![Ok(response(204, "", 3))]);
        let executor = Executor::new(mock, tx);

        let mut handle = executor.start(spec("api.example.com/done")).unwrap();
        let event = rx.recv().await.unwrap();
        assert!(matches!(event.outcome, Outcome::Completed { .. }));

        while !handle.is_finished() {
            tokio::task::yield_now().await;
        }
        handle.stop();
        handle.stop();
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_empty_target_rejected_before_any_network_call() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockTransport::returning(vec![]);
        let executor = Executor::new(mock.clone(), tx);

        let result = executor.start(spec("  "));
        assert_eq!(result.err(), Some(InvalidRequest::EmptyTarget));
        assert_eq!(mock.calls(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_transport_failure_is_a_distinct_outcome() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockTransport::returning(vec![Err(TransportError::Dns(String::from(
            "no such host",
        )))]);
        let executor = Executor::new(mock, tx);

        let handle = executor.start(spec("nohost.invalid/")).unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.id, handle.id());
        match event.outcome {
            Outcome::Failed { error, .. } => {
                assert!(matches!(error, TransportError::Dns(_)));
            }
            other => panic!("expected Failed, got {:?}", other.kind()),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sequential_sends_do_not_interfere() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockTransport::returning(vec![
            Ok(response(200, "first", 10)),
            Ok(response(500, "second", 20)),
        ]);
        let executor = Executor::new(mock, tx);

        let first = executor.start(spec("api.example.com/a")).unwrap();
        let event_a = rx.recv().await.unwrap();
        let second = executor.start(spec("api.example.com/b")).unwrap();
        let event_b = rx.recv().await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(event_a.id, first.id());
        assert_eq!(event_b.id, second.id());

        match (event_a.outcome, event_b.outcome) {
            (
                Outcome::Completed { response: ra, .. },
                Outcome::Completed { response: rb, .. },
            ) => {
                assert_eq!(ra.status, 200);
                assert_eq!(rb.status, 500);
            }
            other => panic!("expected two completions, got {:?}", (other.0.kind(), other.1.kind())),
        }
        assert!(rx.try_recv().is_err());
    }
}
