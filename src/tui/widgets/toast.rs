//! Short-lived confirmation chip.
//!
//! Shown in the top right, under the header, so it never covers the input
//! bar or the SQL editor while the analyst is typing.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

pub struct Toast<'a> {
    message: &'a str,
}

impl<'a> Toast<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    /// Where to draw: right-aligned under the header, sized to the message.
    pub fn area(&self, screen: Rect) -> Rect {
        let content = self.message.chars().count() as u16;
        let width = (content + 4).min(screen.width.saturating_sub(2)).max(8);
        let x = screen.width.saturating_sub(width + 1);
        Rect::new(x, 1, width, 3.min(screen.height))
    }
}

impl Widget for Toast<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let inner = block.inner(area);
        block.render(area, buf);

        let fitted: String = if self.message.chars().count() > inner.width as usize {
            let kept = (inner.width as usize).saturating_sub(1);
            let mut text: String = self.message.chars().take(kept).collect();
            text.push('…');
            text
        } else {
            format!(" {} ", self.message)
        };

        Paragraph::new(fitted)
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .render(inner, buf);
    }
}
