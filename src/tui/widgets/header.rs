//! Top status bar.
//!
//! Shows the app version, active dashboard, oracle status, collection size
//! and the analyst name.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// One-row status bar rendered across the top of the screen.
pub struct Header<'a> {
    dashboard: &'a str,
    analyst: &'a str,
    oracle_active: bool,
    verified_count: usize,
}

impl<'a> Header<'a> {
    pub fn new(
        dashboard: &'a str,
        analyst: &'a str,
        oracle_active: bool,
        verified_count: usize,
    ) -> Self {
        Self {
            dashboard,
            analyst,
            oracle_active,
            verified_count,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(
            " Vouch v{} [{}]",
            env!("CARGO_PKG_VERSION"),
            self.dashboard
        );
        let left_span = Span::styled(left_text, style);
        buf.set_span(area.x, area.y, &left_span, area.width);

        // Right side: oracle status dot, collection size, analyst.
        let oracle_dot = if self.oracle_active { "●" } else { "○" };
        let oracle_color = if self.oracle_active {
            Color::Green
        } else {
            Color::Gray
        };
        let dot_style = Style::default().bg(Color::Blue).fg(oracle_color);

        let right_text = format!(
            " oracle  {} verified  {} ",
            self.verified_count, self.analyst
        );
        let right_width = (right_text.chars().count() + 2) as u16;
        if right_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            buf.set_string(right_x, area.y, " ", style);
            buf.set_string(right_x + 1, area.y, oracle_dot, dot_style);
            buf.set_string(right_x + 2, area.y, &right_text, style);
        }
    }
}
