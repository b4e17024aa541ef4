//! Feed panel widget for the TUI.
//!
//! Displays the transcript: questions, answers, SQL, tables and errors.

use super::table::ResultTable;
use crate::app::FeedItem;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Feed panel widget.
pub struct FeedPanel<'a> {
    items: &'a [FeedItem],
    /// Scroll offset in lines from the bottom.
    scroll: usize,
    focused: bool,
}

impl<'a> FeedPanel<'a> {
    pub fn new(items: &'a [FeedItem], scroll: usize, focused: bool) -> Self {
        Self {
            items,
            scroll,
            focused,
        }
    }

    /// Builds the full transcript as styled lines.
    fn build_lines(&self, width: usize) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        for item in self.items {
            match item {
                FeedItem::Question(text) => {
                    lines.push(Line::from(Span::styled(
                        "You",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )));
                    for wrapped in wrap_text(text, width) {
                        lines.push(Line::from(wrapped));
                    }
                }
                FeedItem::Answer(text) => {
                    lines.push(Line::from(Span::styled(
                        "Vouch",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )));
                    for wrapped in wrap_text(text, width) {
                        lines.push(Line::from(wrapped));
                    }
                }
                FeedItem::Sql { label, sql } => {
                    lines.push(Line::from(Span::styled(
                        *label,
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )));
                    for sql_line in sql.split('\n') {
                        lines.push(Line::from(Span::styled(
                            sql_line.to_string(),
                            Style::default().fg(Color::Magenta),
                        )));
                    }
                }
                FeedItem::Table(table) => {
                    lines.extend(ResultTable::new(table).render_to_lines(width));
                }
                FeedItem::Info(text) => {
                    for wrapped in wrap_text(text, width) {
                        lines.push(Line::from(Span::styled(
                            wrapped,
                            Style::default().fg(Color::Gray),
                        )));
                    }
                }
                FeedItem::Error(text) => {
                    lines.push(Line::from(Span::styled(
                        "Error",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )));
                    for wrapped in wrap_text(text, width) {
                        lines.push(Line::from(Span::styled(
                            wrapped,
                            Style::default().fg(Color::Red),
                        )));
                    }
                }
            }
            lines.push(Line::from(""));
        }

        lines
    }
}

impl Widget for FeedPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Feed ");

        let inner_width = area.width.saturating_sub(2) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;

        let lines = self.build_lines(inner_width);
        let max_scroll = lines.len().saturating_sub(inner_height);
        let offset = max_scroll.saturating_sub(self.scroll.min(max_scroll));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((offset as u16, 0));
        paragraph.render(area, buf);
    }
}

/// Word wraps text to the given width, keeping explicit newlines and the
/// leading indentation of each source line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        out.extend(wrap_line(line, width));
    }
    out
}

fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.len() <= width {
        return vec![line.to_string()];
    }

    let indent: String = line.chars().take_while(|&c| c == ' ').collect();
    let available = width.saturating_sub(indent.len()).max(1);

    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.trim_start().split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= available {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(format!("{indent}{current}"));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        out.push(format!("{indent}{current}"));
    }
    if out.is_empty() {
        out.push(indent);
    }

    out
}
