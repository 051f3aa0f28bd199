//! UI events - messages from the terminal layer to the app layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    ScrollUp,
    ScrollDown,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    /// Tab while editing: header-name or URL completion
    Complete,

    // Request actions
    SendRequest,
    CancelRequest,
    SaveRequest,
    CycleMethod,
    CycleBodyMode,
    CycleRawType,

    // Headers
    NextHeader,
    PrevHeader,
    ToggleHeader,
    AddHeader,
    DeleteHeader,
    EditHeader,

    // Sidebar (history / collections)
    SwitchSidebarTab(SidebarTab),
    NextEntry,
    PrevEntry,
    LoadEntry,

    // Environments
    CycleEnvironment,

    // Response area
    SwitchResponseTab,

    // Layout
    GrowSidebar,
    ShrinkSidebar,
    GrowRequestPane,
    ShrinkRequestPane,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Panel {
    Url,
    Body,
    Headers,
    Response,
    Sidebar,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Url => Panel::Body,
            Panel::Body => Panel::Headers,
            Panel::Headers => Panel::Response,
            Panel::Response => Panel::Sidebar,
            Panel::Sidebar => Panel::Url,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Url => Panel::Sidebar,
            Panel::Body => Panel::Url,
            Panel::Headers => Panel::Body,
            Panel::Response => Panel::Headers,
            Panel::Sidebar => Panel::Response,
        }
    }
}

/// Sidebar tabs
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum SidebarTab {
    #[default]
    History,
    Collections,
}

/// Response display tabs
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum ResponseTab {
    #[default]
    Body,
    Headers,
}

impl ResponseTab {
    pub fn toggle(&self) -> ResponseTab {
        match self {
            ResponseTab::Body => ResponseTab::Headers,
            ResponseTab::Headers => ResponseTab::Body,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('x') => return Some(UiEvent::CancelRequest),
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            _ => {}
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => normal_mode_event(key, active_panel),
        InputMode::Editing => editing_mode_event(key, active_panel),
    }
}

fn normal_mode_event(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Tab => Some(UiEvent::NextPanel),
        KeyCode::BackTab => Some(UiEvent::PrevPanel),
        KeyCode::Char('m') => Some(UiEvent::CycleMethod),
        KeyCode::Char('s') => Some(UiEvent::SendRequest),
        KeyCode::Char('w') => Some(UiEvent::SaveRequest),
        KeyCode::Char('n') => Some(UiEvent::CycleEnvironment),
        KeyCode::Char('1') => Some(UiEvent::SwitchSidebarTab(SidebarTab::History)),
        KeyCode::Char('2') => Some(UiEvent::SwitchSidebarTab(SidebarTab::Collections)),
        KeyCode::Char('<') => Some(UiEvent::ShrinkSidebar),
        KeyCode::Char('>') => Some(UiEvent::GrowSidebar),
        KeyCode::Char('-') => Some(UiEvent::ShrinkRequestPane),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UiEvent::GrowRequestPane),
        KeyCode::Char('b') if active_panel == Panel::Body => Some(UiEvent::CycleBodyMode),
        KeyCode::Char('t') if active_panel == Panel::Body => Some(UiEvent::CycleRawType),
        KeyCode::Char('a') if active_panel == Panel::Headers => Some(UiEvent::AddHeader),
        KeyCode::Char('d') if active_panel == Panel::Headers => Some(UiEvent::DeleteHeader),
        KeyCode::Char('e') => match active_panel {
            Panel::Url | Panel::Body => Some(UiEvent::StartEditing),
            Panel::Headers => Some(UiEvent::EditHeader),
            Panel::Response => Some(UiEvent::SwitchResponseTab),
            Panel::Sidebar => None,
        },
        KeyCode::Enter => match active_panel {
            Panel::Url | Panel::Body => Some(UiEvent::StartEditing),
            Panel::Headers => Some(UiEvent::ToggleHeader),
            Panel::Response => Some(UiEvent::SwitchResponseTab),
            Panel::Sidebar => Some(UiEvent::LoadEntry),
        },
        KeyCode::Up => match active_panel {
            Panel::Headers => Some(UiEvent::PrevHeader),
            Panel::Response => Some(UiEvent::ScrollUp),
            Panel::Sidebar => Some(UiEvent::PrevEntry),
            _ => None,
        },
        KeyCode::Down => match active_panel {
            Panel::Headers => Some(UiEvent::NextHeader),
            Panel::Response => Some(UiEvent::ScrollDown),
            Panel::Sidebar => Some(UiEvent::NextEntry),
            _ => None,
        },
        _ => None,
    }
}

fn editing_mode_event(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Tab => Some(UiEvent::Complete),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        KeyCode::Enter => {
            if active_panel == Panel::Url {
                Some(UiEvent::SendRequest)
            } else {
                Some(UiEvent::StopEditing)
            }
        }
        _ => None,
    }
}
