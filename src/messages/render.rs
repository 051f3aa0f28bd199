//! Render state - snapshot sent from the app layer to the UI for drawing

use crate::builder::{BodyMode, HeaderField, RawType};
use crate::messages::ui_events::{InputMode, Panel, ResponseTab, SidebarTab};
use crate::models::{HttpMethod, ResponseData};

/// What the response area currently shows. The three terminal outcomes
/// stay visually disjoint.
#[derive(Debug, Clone, Default)]
pub enum ResponseView {
    #[default]
    Idle,
    Loading,
    Completed(ResponseData),
    Failed {
        message: String,
        elapsed_ms: u64,
    },
    Cancelled,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Request form
    pub method: HttpMethod,
    pub url: String,
    pub body_mode: BodyMode,
    pub raw_type: RawType,
    pub body_buffer: String,
    pub headers: Vec<HeaderField>,
    pub selected_header: usize,
    pub header_buffer: String,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Response
    pub response: ResponseView,
    pub response_tab: ResponseTab,
    pub response_scroll: u16,
    pub is_loading: bool,

    // Sidebar
    pub sidebar_tab: SidebarTab,
    pub history_labels: Vec<String>,
    pub collection_labels: Vec<String>,
    pub selected_entry: usize,
    pub environment_name: Option<String>,

    // Layout: [sidebar %, request %, response %]
    pub pane_sizes: [u16; 3],

    // Popups / notices
    pub show_help: bool,
    pub notice: Option<String>,
}
