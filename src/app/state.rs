//! App state - the single owner of request form, response view and stores
//!
//! All mutation happens on the app actor's control flow; background tasks
//! only ever reach this through the outcome channel.

use crate::builder::RequestDraft;
use crate::config::{UiConfig, LAYOUT_FILE};
use crate::executor::ExecutionHandle;
use crate::messages::render::{RenderState, ResponseView};
use crate::messages::ui_events::{InputMode, Panel, ResponseTab, SidebarTab};
use crate::storage::Storage;

pub struct AppState {
    // Request form
    pub draft: RequestDraft,
    pub cursor_position: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,

    // Response
    pub response: ResponseView,
    pub response_tab: ResponseTab,
    pub response_scroll: u16,
    pub is_loading: bool,
    /// Handle of the in-flight run, if any. Held until its terminal
    /// event arrives; events for any other id are stale and dropped.
    pub pending: Option<ExecutionHandle>,

    // Headers panel
    pub selected_header: usize,
    /// `Key: Value` buffer while a header row is being edited
    pub header_buffer: String,

    // Sidebar
    pub sidebar_tab: SidebarTab,
    pub selected_entry: usize,

    // Persisted state
    pub storage: Storage,
    pub config: UiConfig,

    // Popups / notices
    pub show_help: bool,
    pub notice: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let storage = Storage::new();
        let config = UiConfig::load(&storage.dir().join(LAYOUT_FILE));
        Self::with_parts(storage, config)
    }

    /// State over explicit storage and config (tests use a temp dir)
    pub fn with_parts(storage: Storage, config: UiConfig) -> Self {
        let draft = RequestDraft::default();
        let cursor_position = draft.url.len();
        AppState {
            draft,
            cursor_position,
            active_panel: Panel::Url,
            input_mode: InputMode::Normal,
            response: ResponseView::Idle,
            response_tab: ResponseTab::Body,
            response_scroll: 0,
            is_loading: false,
            pending: None,
            selected_header: 0,
            header_buffer: String::new(),
            sidebar_tab: SidebarTab::History,
            selected_entry: 0,
            storage,
            config,
            show_help: false,
            notice: None,
        }
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.active_panel {
            Panel::Url => &self.draft.url,
            Panel::Body => self.draft.active_body_buffer(),
            Panel::Headers => &self.header_buffer,
            _ => "",
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> &mut String {
        match self.active_panel {
            Panel::Url => &mut self.draft.url,
            Panel::Body => self.draft.active_body_buffer_mut(),
            Panel::Headers => &mut self.header_buffer,
            _ => &mut self.draft.url, // fallback
        }
    }

    /// Entries shown by the active sidebar tab
    pub fn sidebar_len(&self) -> usize {
        match self.sidebar_tab {
            SidebarTab::History => self.storage.history_len(),
            SidebarTab::Collections => self.storage.collection_entries().count(),
        }
    }

    /// Convert state to RenderState for the UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            method: self.draft.method,
            url: self.draft.url.clone(),
            body_mode: self.draft.body_mode,
            raw_type: self.draft.raw_type,
            body_buffer: self.draft.active_body_buffer().to_string(),
            headers: self.draft.headers.clone(),
            selected_header: self.selected_header,
            header_buffer: self.header_buffer.clone(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            response: self.response.clone(),
            response_tab: self.response_tab,
            response_scroll: self.response_scroll,
            is_loading: self.is_loading,
            sidebar_tab: self.sidebar_tab,
            history_labels: self
                .storage
                .history
                .iter()
                .map(|entry| entry.request.label())
                .collect(),
            collection_labels: self
                .storage
                .collection_entries()
                .map(|(name, request)| format!("{} · {}", name, request.label()))
                .collect(),
            selected_entry: self.selected_entry,
            environment_name: self
                .storage
                .current_environment()
                .map(|env| env.name.clone()),
            pane_sizes: self.config.pane_sizes,
            show_help: self.show_help,
            notice: self.notice.clone(),
        }
    }
}
