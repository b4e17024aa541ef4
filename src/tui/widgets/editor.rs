//! SQL editor widget for the TUI.
//!
//! A small multiline panel showing the current query's SQL. Edits here are
//! what /run executes and /save persists.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

/// SQL editor panel widget.
pub struct SqlEditor<'a> {
    text: &'a str,
    cursor_row: usize,
    focused: bool,
    dirty: bool,
}

impl<'a> SqlEditor<'a> {
    pub fn new(text: &'a str, cursor_row: usize, focused: bool, dirty: bool) -> Self {
        Self {
            text,
            cursor_row,
            focused,
            dirty,
        }
    }

    /// Lines to skip so the cursor's row stays inside `visible` rows.
    pub fn scroll_rows(cursor_row: usize, visible: usize) -> usize {
        if visible == 0 {
            return cursor_row;
        }
        cursor_row.saturating_sub(visible - 1)
    }
}

impl Widget for SqlEditor<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title = if self.dirty {
            " SQL (edited) "
        } else {
            " SQL "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        let visible = area.height.saturating_sub(2) as usize;
        let scroll = Self::scroll_rows(self.cursor_row, visible);

        let lines: Vec<Line> = if self.text.is_empty() {
            vec![Line::styled(
                "No SQL yet. Ask a question to generate some.",
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            self.text
                .split('\n')
                .map(|line| Line::styled(line, Style::default().fg(Color::Magenta)))
                .collect()
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((scroll as u16, 0));
        paragraph.render(area, buf);
    }
}
