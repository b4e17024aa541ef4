//! Sidebar widget for the TUI.
//!
//! Shows the verified collection size, recent session history and context
//! for the current query.

use crate::session::{CurrentQuery, HistoryEntry};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// How many history entries the sidebar shows.
const HISTORY_SHOWN: usize = 5;

/// Sidebar widget.
pub struct Sidebar<'a> {
    verified_count: usize,
    history: &'a [&'a HistoryEntry],
    current: Option<&'a CurrentQuery>,
    scroll: usize,
    focused: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(
        verified_count: usize,
        history: &'a [&'a HistoryEntry],
        current: Option<&'a CurrentQuery>,
        scroll: usize,
        focused: bool,
    ) -> Self {
        Self {
            verified_count,
            history,
            current,
            scroll,
            focused,
        }
    }

    fn heading(text: &str) -> Line<'_> {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn build_lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        lines.push(Line::from(vec![
            Span::styled(
                "Verified queries: ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(self.verified_count.to_string()),
        ]));
        lines.push(Line::from(""));

        lines.push(Self::heading("Recent questions"));
        if self.history.is_empty() {
            lines.push(Line::from(Span::styled(
                "None yet",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for entry in self.history.iter().take(HISTORY_SHOWN) {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{} ", entry.asked_at),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(entry.question.clone()),
                ]));
            }
        }
        lines.push(Line::from(""));

        if let Some(current) = self.current {
            if !current.tables_used.is_empty() {
                lines.push(Self::heading("Tables used"));
                for table in &current.tables_used {
                    lines.push(Line::from(format!("  {table}")));
                }
                lines.push(Line::from(""));
            }

            if !current.related_questions.is_empty() {
                lines.push(Self::heading("Related"));
                for (i, question) in current.related_questions.iter().enumerate() {
                    lines.push(Line::from(format!("  {}. {question}", i + 1)));
                }
            }
        }

        lines
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Session ");

        let paragraph = Paragraph::new(self.build_lines())
            .block(block)
            .scroll((self.scroll as u16, 0));
        paragraph.render(area, buf);
    }
}
