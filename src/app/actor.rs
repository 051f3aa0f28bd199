//! App actor - message loop processing UI events and execution outcomes

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::executor::Executor;
use crate::messages::{ExecutionEvent, RenderState, UiEvent};

/// App actor that processes UI events and execution events
pub struct AppActor {
    state: AppState,
    executor: Executor,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(executor: Executor, render_tx: mpsc::UnboundedSender<RenderState>) -> Self {
        AppActor {
            state: AppState::new(),
            executor,
            render_tx,
        }
    }

    /// Actor over pre-built state (tests use storage in a temp dir)
    pub fn with_state(
        state: AppState,
        executor: Executor,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            executor,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut event_rx: mpsc::UnboundedReceiver<ExecutionEvent>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit: stop the in-flight run, flush persisted state
                        self.state.persist();
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(event) = event_rx.recv() => {
                    self.state.handle_execution_event(event);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Panel navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::Complete => self.state.complete_current(),

            // Request actions
            UiEvent::CycleMethod => self.state.cycle_method(),
            UiEvent::CycleBodyMode => self.state.cycle_body_mode(),
            UiEvent::CycleRawType => self.state.cycle_raw_type(),
            UiEvent::SendRequest => self.send_request(),
            UiEvent::CancelRequest => self.state.cancel_request(),
            UiEvent::SaveRequest => self.state.save_request(),

            // Headers
            UiEvent::NextHeader => self.state.next_header(),
            UiEvent::PrevHeader => self.state.prev_header(),
            UiEvent::ToggleHeader => self.state.toggle_header(),
            UiEvent::AddHeader => self.state.add_header(),
            UiEvent::DeleteHeader => self.state.delete_header(),
            UiEvent::EditHeader => self.state.edit_header(),

            // Sidebar
            UiEvent::SwitchSidebarTab(tab) => self.state.switch_sidebar_tab(tab),
            UiEvent::NextEntry => self.state.next_entry(),
            UiEvent::PrevEntry => self.state.prev_entry(),
            UiEvent::LoadEntry => self.state.load_entry(),

            // Environments
            UiEvent::CycleEnvironment => self.state.cycle_environment(),

            // Response area
            UiEvent::SwitchResponseTab => self.state.switch_response_tab(),

            // Layout
            UiEvent::GrowSidebar => self.state.grow_sidebar(),
            UiEvent::ShrinkSidebar => self.state.shrink_sidebar(),
            UiEvent::GrowRequestPane => self.state.grow_request_pane(),
            UiEvent::ShrinkRequestPane => self.state.shrink_request_pane(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }

    /// Freeze the draft and hand it to the executor
    fn send_request(&mut self) {
        if let Some(spec) = self.state.prepare_send() {
            match self.executor.start(spec) {
                Ok(handle) => self.state.attach_handle(handle),
                Err(err) => self.state.reject_send(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::executor::{Transport, TransportError};
    use crate::messages::render::ResponseView;
    use crate::models::{RequestSpec, ResponseData};
    use crate::storage::Storage;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct StaticTransport(u16);

    #[async_trait]
    impl Transport for StaticTransport {
        async fn send(&self, _request: &RequestSpec) -> Result<ResponseData, TransportError> {
            Ok(ResponseData {
                status: self.0,
                headers: vec![(
                    String::from("content-type"),
                    String::from("application/json"),
                )],
                body: String::from(r#"{"ok":true}"#),
                elapsed: Duration::from_millis(12),
            })
        }
    }

    /// Drive a full send through actor, executor and back: the response
    /// view updates and history gains an entry, all on the actor's flow.
    #[tokio::test]
    async fn test_send_round_trip_updates_view_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_parts(
            Storage::with_dir(dir.path().to_path_buf()),
            UiConfig::default(),
        );

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();

        let executor = Executor::new(Arc::new(StaticTransport(200)), event_tx);
        let actor = AppActor::with_state(state, executor, render_tx);
        let actor_task = tokio::spawn(actor.run(ui_rx, event_rx));

        ui_tx.send(UiEvent::SendRequest).unwrap();

        // Initial snapshot, the loading snapshot, then the completion
        let mut last = None;
        for _ in 0..3 {
            if let Some(state) = render_rx.recv().await {
                last = Some(state);
            }
        }
        let last = last.unwrap();
        match &last.response {
            ResponseView::Completed(resp) => {
                assert_eq!(resp.status, 200);
                assert!(resp.body.contains("\"ok\""));
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(last.history_labels.len(), 1);
        assert!(!last.is_loading);

        ui_tx.send(UiEvent::Quit).unwrap();
        actor_task.await.unwrap();
    }
}
