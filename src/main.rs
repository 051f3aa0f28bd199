//! Courier TUI - actor-based HTTP request workbench
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Executor (Tokio) - async HTTP execution, one task per send

mod app;
mod builder;
mod completion;
mod config;
mod constants;
mod executor;
mod messages;
mod models;
mod storage;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use app::AppActor;
use builder::BodyMode;
use executor::{Executor, HttpTransport, Transport};
use messages::ui_events::{key_to_ui_event, InputMode, Panel, ResponseTab, SidebarTab};
use messages::{ExecutionEvent, RenderState, ResponseView, UiEvent};
use ui::{highlight_json, method_color, render_tabs, status_color, status_reason};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "courier.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<ExecutionEvent>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn app actor with its executor
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
    let app_executor = Executor::new(transport, event_tx);
    let app_actor = AppActor::new(app_executor, render_tx);
    let actor_task = tokio::spawn(app_actor.run(ui_rx, event_rx));

    // Run UI loop (synchronous rendering with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    // Let the actor flush history and layout before the process exits
    let _ = actor_task.await;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    // First snapshot arrives right after the actor starts
    let mut current_state = match render_rx.recv().await {
        Some(state) => state,
        None => return Ok(()),
    };

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(state.pane_sizes[0]), // Sidebar
            Constraint::Min(0),                          // Main column
        ])
        .split(outer[0]);

    draw_sidebar(f, state, columns[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                       // Method + URL
            Constraint::Percentage(state.pane_sizes[1]), // Request panels
            Constraint::Min(5),                          // Response
        ])
        .split(columns[1]);

    draw_url_bar(f, state, main[0]);
    draw_request_area(f, state, main[1]);
    draw_response(f, state, main[2]);
    draw_status_bar(f, state, outer[1]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_sidebar(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Sidebar;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" 1:History 2:Collections ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Entries
            Constraint::Length(1), // Environment line
        ])
        .split(inner);

    let selected_tab = match state.sidebar_tab {
        SidebarTab::History => 0,
        SidebarTab::Collections => 1,
    };
    f.render_widget(render_tabs(&["History", "Collections"], selected_tab), chunks[0]);

    let labels = match state.sidebar_tab {
        SidebarTab::History => &state.history_labels,
        SidebarTab::Collections => &state.collection_labels,
    };

    if labels.is_empty() {
        let hint = match state.sidebar_tab {
            SidebarTab::History => "No requests sent yet",
            SidebarTab::Collections => "Nothing saved yet (w:save)",
        };
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
    } else {
        let items: Vec<ListItem> = labels
            .iter()
            .map(|label| ListItem::new(label.as_str()))
            .collect();
        let highlight_style = if is_focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default()
        };
        let list = List::new(items).highlight_style(highlight_style);
        let mut list_state = ListState::default();
        list_state.select(Some(state.selected_entry.min(labels.len() - 1)));
        f.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    let env_text = match &state.environment_name {
        Some(name) => format!(" env: {} (n:cycle)", name),
        None => String::from(" env: none (n:cycle)"),
    };
    f.render_widget(
        Paragraph::new(env_text).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn draw_url_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Url;
    let mcolor = method_color(state.method.as_str());

    let border_style = if is_focused && state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let loading = if state.is_loading { " [...]" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {}{} ", state.method.as_str(), loading))
        .title_style(Style::default().fg(mcolor).bold());

    let input = Paragraph::new(state.url.as_str()).block(block);
    f.render_widget(input, area);

    // Cursor
    if is_focused && state.input_mode == InputMode::Editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_request_area(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let selected_tab = match state.active_panel {
        Panel::Headers => 1,
        _ => 0,
    };
    f.render_widget(render_tabs(&["Body", "Headers"], selected_tab), chunks[0]);

    if state.active_panel == Panel::Headers {
        draw_headers_panel(f, state, chunks[1]);
    } else {
        draw_body_panel(f, state, chunks[1]);
    }
}

fn draw_body_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Body;
    let border_style = if is_focused && state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = if !state.method.has_body() {
        String::from(" Body (disabled for GET) ")
    } else {
        match state.body_mode {
            BodyMode::Text => format!(" Body · {} (b:mode t:type) ", state.raw_type.as_str()),
            BodyMode::Form => String::from(" Body · Form key=value; (b:mode) "),
            BodyMode::File => String::from(" Body · File path (b:mode) "),
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let content = if state.method.has_body() {
        state.body_buffer.as_str()
    } else {
        ""
    };

    let body = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    f.render_widget(body, area);

    if is_focused && state.input_mode == InputMode::Editing && state.method.has_body() {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_headers_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Headers;
    let editing = is_focused && state.input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let items: Vec<ListItem> = state
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let selected = is_focused && i == state.selected_header;
            if editing && selected {
                // Row under edit shows the raw buffer
                return ListItem::new(format!("> {}", state.header_buffer))
                    .style(Style::default().fg(Color::Yellow));
            }
            let style = if !h.enabled {
                Style::default().fg(Color::DarkGray)
            } else if selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default()
            };
            let prefix = if h.enabled { "[x]" } else { "[ ]" };
            ListItem::new(format!("{} {}: {}", prefix, h.key, h.value)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Headers (a:add d:del e:edit Enter:toggle) "),
    );
    f.render_widget(list, area);

    if editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let max_y = area.y + area.height.saturating_sub(2);
        let cursor_x = (area.x + 3 + state.cursor_position as u16).min(max_x);
        let cursor_y = (area.y + 1 + state.selected_header as u16).min(max_y);
        f.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_response(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Response;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let (title, info, lines) = match &state.response {
        ResponseView::Idle => (
            Span::raw(" Response "),
            String::new(),
            idle_lines(),
        ),
        ResponseView::Loading => (
            Span::styled(" Sending... ", Style::default().fg(Color::Yellow)),
            String::new(),
            vec![Line::from(Span::styled(
                "Waiting for response (Ctrl+X to cancel)",
                Style::default().fg(Color::Yellow),
            ))],
        ),
        ResponseView::Completed(resp) => {
            let color = status_color(resp.status);
            let title = Span::styled(
                format!(" {} {} ", resp.status, status_reason(resp.status)),
                Style::default().fg(color).bold(),
            );
            let info = format!(
                " {} ms · {} ",
                resp.elapsed_ms(),
                resp.content_type().unwrap_or("-")
            );
            let lines = match state.response_tab {
                ResponseTab::Body => highlight_json(&resp.body),
                ResponseTab::Headers => resp
                    .headers
                    .iter()
                    .map(|(k, v)| {
                        Line::from(vec![
                            Span::styled(format!("{}: ", k), Style::default().fg(Color::Cyan)),
                            Span::raw(v.clone()),
                        ])
                    })
                    .collect(),
            };
            (title, info, lines)
        }
        ResponseView::Failed { message, elapsed_ms } => (
            Span::styled(" Failed ", Style::default().fg(Color::Red).bold()),
            format!(" {} ms ", elapsed_ms),
            vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))],
        ),
        ResponseView::Cancelled => (
            Span::styled(" Cancelled ", Style::default().fg(Color::Yellow).bold()),
            String::new(),
            vec![Line::from(Span::styled(
                "Request cancelled",
                Style::default().fg(Color::Yellow),
            ))],
        ),
    };

    let tab_hint = match (&state.response, state.response_tab) {
        (ResponseView::Completed(_), ResponseTab::Body) => " [Body] Headers (e:switch) ",
        (ResponseView::Completed(_), ResponseTab::Headers) => " Body [Headers] (e:switch) ",
        _ => "",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_bottom(Line::from(tab_hint).left_aligned())
        .title_bottom(Line::from(info).right_aligned());

    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.response_scroll, 0));
    f.render_widget(response, area);
}

fn idle_lines() -> Vec<Line<'static>> {
    let text = r#"Quick Reference:
────────────────────────────
  s     Send request
  m     Change method
  Tab   Next panel
  e     Edit field
  w     Save to collection
  n     Cycle environment
  ?     Full help
  q     Quit
────────────────────────────
Press 's' to send your first request!"#;
    text.lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::DarkGray))))
        .collect()
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let (text, style) = if let Some(notice) = &state.notice {
        (
            format!(" {} ", notice),
            Style::default().fg(Color::Yellow),
        )
    } else if state.is_loading {
        (
            String::from(" Sending... Ctrl+X:cancel "),
            Style::default().fg(Color::Yellow),
        )
    } else if state.input_mode == InputMode::Editing {
        (
            String::from(" ESC:done | Tab:complete | arrows:move "),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            String::from(" Tab:panel | e:edit | m:method | s:send | w:save | n:env | ?:help | q:quit "),
            Style::default().fg(Color::DarkGray),
        )
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 COURIER - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   Up / Down          Scroll response / move selection
   1 / 2              Sidebar: History / Collections

 REQUEST
   m                  Cycle HTTP method
   s                  Send request
   Ctrl+X             Cancel in-flight request
   e / Enter          Edit current field
   w                  Save request to collection
   n                  Cycle environment

 BODY
   b                  Cycle body mode (Text/Form/File)
   t                  Cycle raw type (Text/JSON/XML)

 HEADERS
   a                  Add header
   d                  Delete selected header
   e                  Edit selected header (Key: Value)
   Enter              Toggle header on/off

 EDITING
   Tab                Complete URL / header name
   Esc                Stop editing

 LAYOUT
   < / >              Shrink / grow sidebar
   - / +              Shrink / grow request pane

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
