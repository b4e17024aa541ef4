//! Question input bar.
//!
//! Single line input with horizontal scrolling and a busy state.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const PROMPT: &str = "> ";
const PLACEHOLDER: &str = "Ask a question or type /help";

/// Scroll offset that keeps the cursor inside the visible window.
///
/// Returns the number of characters hidden off the left edge.
pub fn calculate_scroll_offset(cursor: usize, available_width: usize) -> usize {
    cursor.saturating_sub(available_width)
}

/// Input bar widget.
pub struct InputBar<'a> {
    text: &'a str,
    cursor: usize,
    focused: bool,
    busy: bool,
}

impl<'a> InputBar<'a> {
    pub fn new(text: &'a str, cursor: usize, focused: bool, busy: bool) -> Self {
        Self {
            text,
            cursor,
            focused,
            busy,
        }
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title = if self.busy { " Working… " } else { " Ask " };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        // Two border cells, the prompt, and one cell for the cursor.
        let reserved = 2 + PROMPT.len() + 1;
        let available_width = (area.width as usize).saturating_sub(reserved);
        let scroll_offset = calculate_scroll_offset(self.cursor, available_width);

        let prompt_style = if self.busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        };

        let content = if self.text.is_empty() && !self.busy {
            Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let visible = self.text.get(scroll_offset..).unwrap_or("");
            if self.busy {
                Span::styled(visible, Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(visible)
            }
        };

        let line = Line::from(vec![Span::styled(PROMPT, prompt_style), content]);
        Paragraph::new(line).block(block).render(area, buf);
    }
}
