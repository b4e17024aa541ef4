//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Focus};
use super::widgets::{editor, feed, header, input, sidebar, toast};
use crate::app::Workbench;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App, workbench: &Workbench) {
    let area = frame.area();

    // Main layout: header, content, SQL editor, input.
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(8),
            Constraint::Length(3),
        ])
        .split(area);

    let header_area = main_layout[0];
    let content_area = main_layout[1];
    let editor_area = main_layout[2];
    let input_area = main_layout[3];

    // Content layout: feed (70%) and sidebar (30%).
    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(content_area);

    let feed_area = content_layout[0];
    let sidebar_area = content_layout[1];

    render_header(frame, header_area, workbench);
    render_feed(frame, feed_area, app);
    render_sidebar(frame, sidebar_area, app, workbench);
    render_editor(frame, editor_area, app, workbench);
    render_input(frame, input_area, app);

    if let Some(message) = app.toast() {
        let widget = toast::Toast::new(message);
        let toast_area = widget.area(area);
        frame.render_widget(widget, toast_area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, workbench: &Workbench) {
    let widget = header::Header::new(
        workbench.dashboard().label(),
        &workbench.session().analyst,
        workbench.has_oracle(),
        workbench.store().len(),
    );
    frame.render_widget(widget, area);
}

fn render_feed(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Feed;
    let widget = feed::FeedPanel::new(&app.feed, app.feed_scroll, focused);
    frame.render_widget(widget, area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App, workbench: &Workbench) {
    let focused = app.focus == Focus::Sidebar;
    let session = workbench.session();
    let history = session.history.recent(5);
    let widget = sidebar::Sidebar::new(
        workbench.store().len(),
        &history,
        session.current(),
        app.sidebar_scroll,
        focused,
    );
    frame.render_widget(widget, area);
}

fn render_editor(frame: &mut Frame, area: Rect, app: &App, workbench: &Workbench) {
    let focused = app.focus == Focus::SqlEditor;
    let dirty = workbench
        .session()
        .current()
        .map(|c| c.is_dirty())
        .unwrap_or(false);
    let (cursor_row, cursor_col) = app.editor.cursor_position();
    let widget = editor::SqlEditor::new(&app.editor.text, cursor_row, focused, dirty);
    frame.render_widget(widget, area);

    if focused {
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = editor::SqlEditor::scroll_rows(cursor_row, visible);
        let cursor_x = area.x + 1 + cursor_col as u16;
        let cursor_y = area.y + 1 + (cursor_row - scroll) as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Input;
    let widget = input::InputBar::new(&app.input.text, app.input.cursor, focused, app.is_processing);
    frame.render_widget(widget, area);

    if focused {
        // Border (1) + prompt "> " (2), adjusted for horizontal scroll.
        let available_width = area.width.saturating_sub(5) as usize;
        let scroll = input::calculate_scroll_offset(app.input.cursor, available_width);
        let cursor_x = area.x + 1 + 2 + (app.input.cursor - scroll) as u16;
        let cursor_y = area.y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}
