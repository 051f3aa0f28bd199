//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::builder::{BodyMode, HeaderField, InvalidRequest};
use crate::completion;
use crate::config::LAYOUT_FILE;
use crate::executor::ExecutionHandle;
use crate::messages::render::ResponseView;
use crate::messages::ui_events::{InputMode, Panel, SidebarTab};
use crate::messages::{ExecutionEvent, Outcome};
use crate::models::{HistoryEntry, RequestSpec};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        // GET has no body to edit
        if self.active_panel == Panel::Body && !self.draft.method.has_body() {
            return;
        }
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    pub fn stop_editing(&mut self) {
        if self.active_panel == Panel::Headers {
            self.commit_header_edit();
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let input = self.current_input_mut();
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let cursor_pos = self.cursor_position;
            let input = self.current_input_mut();
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    /// Tab while editing: complete the URL from history, or the header
    /// key from the common-header table
    pub fn complete_current(&mut self) {
        match self.active_panel {
            Panel::Url => {
                let urls: Vec<String> = self
                    .storage
                    .history
                    .iter()
                    .map(|entry| entry.request.url())
                    .collect();
                if let Some(completed) =
                    completion::complete_url(&self.draft.url, urls.iter().map(String::as_str))
                {
                    self.draft.url = completed;
                    self.cursor_position = self.draft.url.len();
                }
            }
            Panel::Headers => {
                // Only the key part, before the separator, completes
                if !self.header_buffer.contains(':') {
                    if let Some(completed) = completion::complete_header_key(&self.header_buffer) {
                        self.header_buffer = completed;
                        self.cursor_position = self.header_buffer.len();
                    }
                }
            }
            _ => {}
        }
    }

    // ========================
    // Method and body mode
    // ========================

    pub fn cycle_method(&mut self) {
        if !self.is_loading {
            self.draft.method = self.draft.method.next();
        }
    }

    pub fn cycle_body_mode(&mut self) {
        self.draft.switch_body_mode();
        self.cursor_position = self.draft.active_body_buffer().len();
    }

    pub fn cycle_raw_type(&mut self) {
        if self.draft.body_mode == BodyMode::Text {
            self.draft.cycle_raw_type();
        }
    }

    // ========================
    // Response scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1);
    }

    pub fn switch_response_tab(&mut self) {
        self.response_tab = self.response_tab.toggle();
        self.response_scroll = 0;
    }

    // ========================
    // Headers
    // ========================

    pub fn next_header(&mut self) {
        if !self.draft.headers.is_empty() {
            self.selected_header = (self.selected_header + 1) % self.draft.headers.len();
        }
    }

    pub fn prev_header(&mut self) {
        if !self.draft.headers.is_empty() {
            self.selected_header = self
                .selected_header
                .checked_sub(1)
                .unwrap_or(self.draft.headers.len() - 1);
        }
    }

    pub fn toggle_header(&mut self) {
        if let Some(header) = self.draft.headers.get_mut(self.selected_header) {
            header.enabled = !header.enabled;
        }
    }

    pub fn add_header(&mut self) {
        self.draft.headers.push(HeaderField::new("", ""));
        self.selected_header = self.draft.headers.len() - 1;
        self.edit_header();
    }

    pub fn delete_header(&mut self) {
        if !self.draft.headers.is_empty() {
            self.draft.headers.remove(self.selected_header);
            if self.selected_header > 0 {
                self.selected_header -= 1;
            }
        }
    }

    pub fn edit_header(&mut self) {
        let Some(header) = self.draft.headers.get(self.selected_header) else {
            return;
        };
        self.header_buffer = if header.key.is_empty() {
            String::new()
        } else {
            format!("{}: {}", header.key, header.value)
        };
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.header_buffer.len();
    }

    /// Parse the `Key: Value` buffer back into the selected row
    fn commit_header_edit(&mut self) {
        let buffer = std::mem::take(&mut self.header_buffer);
        let Some(header) = self.draft.headers.get_mut(self.selected_header) else {
            return;
        };
        let (key, value) = match buffer.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (buffer.trim(), ""),
        };
        if key.is_empty() {
            return;
        }
        header.key = key.to_string();
        header.value = value.to_string();
    }

    // ========================
    // Sidebar: history and collections
    // ========================

    pub fn switch_sidebar_tab(&mut self, tab: SidebarTab) {
        self.sidebar_tab = tab;
        self.selected_entry = 0;
    }

    pub fn next_entry(&mut self) {
        let len = self.sidebar_len();
        if len > 0 {
            self.selected_entry = (self.selected_entry + 1) % len;
        }
    }

    pub fn prev_entry(&mut self) {
        let len = self.sidebar_len();
        if len > 0 {
            self.selected_entry = self.selected_entry.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// Restore the selected history or collection request into the form
    pub fn load_entry(&mut self) {
        let spec = match self.sidebar_tab {
            SidebarTab::History => self
                .storage
                .get_history(self.selected_entry)
                .map(|entry| entry.request.clone()),
            SidebarTab::Collections => self
                .storage
                .collection_entries()
                .nth(self.selected_entry)
                .map(|(_, request)| request.clone()),
        };

        if let Some(spec) = spec {
            self.draft.restore_from(&spec);
            self.cursor_position = self.draft.url.len();
            self.active_panel = Panel::Url;
            self.notice = Some(format!("Loaded {}", spec.label()));
        }
    }

    // ========================
    // Environments
    // ========================

    pub fn cycle_environment(&mut self) {
        let name = self.storage.cycle_environment().map(str::to_string);
        self.notice = Some(match name {
            Some(name) => format!("Environment: {}", name),
            None => String::from("Environment: none"),
        });
    }

    // ========================
    // Layout
    // ========================

    pub fn grow_sidebar(&mut self) {
        self.config.pane_sizes[0] = (self.config.pane_sizes[0] + 5).min(50);
    }

    pub fn shrink_sidebar(&mut self) {
        self.config.pane_sizes[0] = self.config.pane_sizes[0].saturating_sub(5).max(10);
    }

    pub fn grow_request_pane(&mut self) {
        let request = (self.config.pane_sizes[1] + 5).min(80);
        self.config.pane_sizes[1] = request;
        self.config.pane_sizes[2] = 100 - request;
    }

    pub fn shrink_request_pane(&mut self) {
        let request = self.config.pane_sizes[1].saturating_sub(5).max(20);
        self.config.pane_sizes[1] = request;
        self.config.pane_sizes[2] = 100 - request;
    }

    // ========================
    // Request sending
    // ========================

    /// Build the draft into a spec and mark the UI as loading.
    ///
    /// A still-pending predecessor is stopped first: one in-flight run
    /// per session, newest wins. Build errors surface as a notice and
    /// nothing is dispatched.
    pub fn prepare_send(&mut self) -> Option<RequestSpec> {
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
        }

        match self.draft.build(self.storage.current_environment()) {
            Ok(spec) => {
                // Newest wins: stop a still-pending predecessor. Its
                // stale events are dropped by the pending-id filter.
                if let Some(handle) = self.pending.as_mut() {
                    handle.stop();
                }
                self.is_loading = true;
                self.response = ResponseView::Loading;
                self.response_scroll = 0;
                self.notice = None;
                Some(spec)
            }
            Err(err) => {
                self.notice = Some(err.to_string());
                None
            }
        }
    }

    pub fn attach_handle(&mut self, handle: ExecutionHandle) {
        self.pending = Some(handle);
    }

    /// Executor refused the spec. Unreachable after a successful build,
    /// but the start contract can still reject.
    pub fn reject_send(&mut self, err: InvalidRequest) {
        self.is_loading = false;
        self.response = ResponseView::Idle;
        self.notice = Some(err.to_string());
    }

    /// Ask the pending run to stop. The Cancelled event does the rest.
    pub fn cancel_request(&mut self) {
        if let Some(handle) = self.pending.as_mut() {
            handle.stop();
        }
    }

    // ========================
    // Outcome handling
    // ========================

    pub fn handle_execution_event(&mut self, event: ExecutionEvent) {
        let is_for_pending = self.pending.as_ref().map(ExecutionHandle::id) == Some(event.id);
        if !is_for_pending {
            tracing::debug!(id = event.id, kind = event.outcome.kind(), "dropping stale execution event");
            return;
        }

        match event.outcome {
            Outcome::Completed { response, request } => {
                self.storage.add_to_history(HistoryEntry {
                    request: (*request).clone(),
                    response: response.clone(),
                    timestamp: chrono::Utc::now(),
                });

                // History keeps the body as transported; the view gets
                // pretty-printed JSON when the body parses as such
                let mut shown = response;
                if let Ok(json) = serde_json::from_str::<serde_json::Value>(&shown.body) {
                    shown.body = serde_json::to_string_pretty(&json).unwrap_or(shown.body);
                }
                self.response = ResponseView::Completed(shown);
                self.finalize_request();
            }
            Outcome::Failed { error, elapsed } => {
                self.response = ResponseView::Failed {
                    message: error.to_string(),
                    elapsed_ms: elapsed.as_millis() as u64,
                };
                self.finalize_request();
            }
            Outcome::Cancelled => {
                self.response = ResponseView::Cancelled;
                self.finalize_request();
            }
        }
    }

    fn finalize_request(&mut self) {
        self.is_loading = false;
        self.pending = None;
        self.response_scroll = 0;
        self.response_tab = crate::messages::ui_events::ResponseTab::Body;
    }

    // ========================
    // Saving
    // ========================

    /// Save the current form to the default collection, independent of
    /// execution
    pub fn save_request(&mut self) {
        match self.draft.build(self.storage.current_environment()) {
            Ok(spec) => {
                let label = spec.label();
                match self.storage.save_to_collection(spec) {
                    Ok(()) => self.notice = Some(format!("Saved {}", label)),
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to persist collection");
                        self.notice = Some(format!("Save failed: {}", err));
                    }
                }
            }
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    /// Flush history and layout on the way out
    pub fn persist(&mut self) {
        self.cancel_request();
        if let Err(err) = self.storage.save_history() {
            tracing::warn!(error = %err, "failed to persist history");
        }
        let path = self.storage.dir().join(LAYOUT_FILE);
        if let Err(err) = self.config.save(&path) {
            tracing::warn!(error = %err, "failed to persist layout");
        }
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::models::{HttpMethod, ResponseData, Scheme};
    use crate::storage::Storage;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    fn state() -> AppState {
        let dir = tempfile::tempdir().unwrap();
        AppState::with_parts(
            Storage::with_dir(dir.path().to_path_buf()),
            UiConfig::default(),
        )
    }

    fn completed_event(id: u64, target: &str, status: u16) -> ExecutionEvent {
        let request = RequestSpec {
            method: HttpMethod::GET,
            scheme: Scheme::Https,
            target: target.to_string(),
            headers: HashMap::new(),
            body: crate::models::RequestBody::Empty,
            context: HashMap::new(),
            date: chrono::Utc::now().date_naive(),
        };
        ExecutionEvent {
            id,
            outcome: Outcome::Completed {
                response: ResponseData {
                    status,
                    headers: Vec::new(),
                    body: String::from(r#"{"ok":true}"#),
                    elapsed: Duration::from_millis(7),
                },
                request: Arc::new(request),
            },
        }
    }

    #[test]
    fn test_stale_events_are_dropped() {
        let mut state = state();
        // No pending run: any event is stale
        state.handle_execution_event(completed_event(9, "api.example.com/x", 200));
        assert!(matches!(state.response, ResponseView::Idle));
        assert_eq!(state.storage.history_len(), 0);
    }

    #[test]
    fn test_invalid_draft_sets_notice_and_sends_nothing() {
        let mut state = state();
        state.draft.url = String::from("  ");
        assert!(state.prepare_send().is_none());
        assert!(!state.is_loading);
        assert_eq!(state.notice.as_deref(), Some("request target is empty"));
    }

    #[test]
    fn test_prepare_send_marks_loading() {
        let mut state = state();
        let spec = state.prepare_send().unwrap();
        assert_eq!(spec.target, "httpbin.org/get");
        assert!(state.is_loading);
        assert!(matches!(state.response, ResponseView::Loading));
    }

    #[test]
    fn test_header_edit_commits_on_stop() {
        let mut state = state();
        state.active_panel = Panel::Headers;
        state.selected_header = 0;
        state.edit_header();
        state.header_buffer = String::from("X-Trace-Id:  abc123 ");
        state.stop_editing();
        assert_eq!(state.draft.headers[0].key, "X-Trace-Id");
        assert_eq!(state.draft.headers[0].value, "abc123");
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_header_completion_while_editing() {
        let mut state = state();
        state.active_panel = Panel::Headers;
        state.header_buffer = String::from("auth");
        state.complete_current();
        assert_eq!(state.header_buffer, "Authorization");
    }

    #[test]
    fn test_load_entry_restores_history_into_form() {
        let mut state = state();
        state.storage.add_to_history(crate::models::HistoryEntry {
            request: RequestSpec {
                method: HttpMethod::DELETE,
                scheme: Scheme::Http,
                target: String::from("localhost:9000/items/7"),
                headers: HashMap::new(),
                body: crate::models::RequestBody::Empty,
                context: HashMap::new(),
                date: chrono::Utc::now().date_naive(),
            },
            response: ResponseData {
                status: 204,
                headers: Vec::new(),
                body: String::new(),
                elapsed: Duration::from_millis(3),
            },
            timestamp: chrono::Utc::now(),
        });

        state.active_panel = Panel::Sidebar;
        state.load_entry();
        assert_eq!(state.draft.method, HttpMethod::DELETE);
        assert_eq!(state.draft.url, "http://localhost:9000/items/7");
        assert_eq!(state.active_panel, Panel::Url);
    }

    #[test]
    fn test_request_pane_resize_keeps_split_complementary() {
        let mut state = state();
        state.grow_request_pane();
        assert_eq!(
            state.config.pane_sizes[1] + state.config.pane_sizes[2],
            100
        );
        state.shrink_request_pane();
        state.shrink_request_pane();
        assert_eq!(
            state.config.pane_sizes[1] + state.config.pane_sizes[2],
            100
        );
    }
}
