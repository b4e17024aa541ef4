//! Result table widget for the TUI.
//!
//! Renders catalog results with box-drawn borders, content-sized columns
//! and right-aligned numeric values.

use crate::catalog::TableData;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Widest a column may grow before its values are clipped.
const MAX_COLUMN_WIDTH: usize = 40;

/// Columns never shrink below this, even on narrow screens.
const MIN_COLUMN_WIDTH: usize = 4;

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Widget for rendering an execution result as a table.
pub struct ResultTable<'a> {
    table: &'a TableData,
}

impl<'a> ResultTable<'a> {
    pub fn new(table: &'a TableData) -> Self {
        Self { table }
    }

    /// Content-driven width per column, clamped to the column bounds.
    fn natural_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .table
            .columns
            .iter()
            .map(|name| name.chars().count())
            .collect();

        for row in &self.table.rows {
            for (i, value) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(value.chars().count());
                }
            }
        }

        widths
            .into_iter()
            .map(|w| w.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH))
            .collect()
    }

    /// Shrinks the widest column first until the table fits, flooring each
    /// column at `MIN_COLUMN_WIDTH`.
    fn fit_widths(mut widths: Vec<usize>, available: usize) -> Vec<usize> {
        // Each column carries two padding cells and a border, plus the
        // closing border.
        let chrome = widths.len() * 3 + 1;
        let mut total = widths.iter().sum::<usize>() + chrome;

        while total > available {
            let widest = widths
                .iter()
                .enumerate()
                .max_by_key(|(_, w)| **w)
                .map(|(i, _)| i);
            match widest {
                Some(i) if widths[i] > MIN_COLUMN_WIDTH => {
                    widths[i] -= 1;
                    total -= 1;
                }
                _ => break,
            }
        }

        widths
    }

    /// Marks the columns whose values are all numbers (NULLs and blanks
    /// aside), so they can be right-aligned.
    fn numeric_columns(&self) -> Vec<bool> {
        (0..self.table.columns.len())
            .map(|col| {
                let mut any = false;
                for row in &self.table.rows {
                    match row.get(col).map(String::as_str) {
                        None | Some("") | Some("NULL") => {}
                        Some(value) if value.trim().parse::<f64>().is_ok() => any = true,
                        Some(_) => return false,
                    }
                }
                any
            })
            .collect()
    }

    /// Clips a value to `width` characters, ending in an ellipsis.
    fn clip(s: &str, width: usize) -> String {
        if s.chars().count() <= width {
            return s.to_string();
        }
        if width <= 1 {
            return s.chars().take(width).collect();
        }
        let mut clipped: String = s.chars().take(width - 1).collect();
        clipped.push('…');
        clipped
    }

    fn cell(text: &str, width: usize, numeric: bool) -> String {
        let clipped = Self::clip(text, width);
        if numeric {
            format!(" {clipped:>width$} ")
        } else {
            format!(" {clipped:<width$} ")
        }
    }

    /// Renders the table to a vector of lines for embedding in other widgets.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'a>> {
        if self.table.columns.is_empty() {
            return vec![Line::from(Span::styled("(empty result)", dim()))];
        }

        let widths = Self::fit_widths(self.natural_widths(), available_width);
        let numeric = self.numeric_columns();

        let mut lines = vec![
            Self::border_line(&widths, '┌', '┬', '┐'),
            self.header_line(&widths),
            Self::border_line(&widths, '├', '┼', '┤'),
        ];
        for row in &self.table.rows {
            lines.push(Self::row_line(row, &widths, &numeric));
        }
        lines.push(Self::border_line(&widths, '└', '┴', '┘'));
        lines.push(Line::from(Span::styled(self.footer(), dim())));

        lines
    }

    fn border_line(widths: &[usize], left: char, mid: char, right: char) -> Line<'a> {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        let border = format!("{left}{}{right}", segments.join(&mid.to_string()));
        Line::from(Span::styled(border, dim()))
    }

    fn header_line(&self, widths: &[usize]) -> Line<'a> {
        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled("│", dim())];
        for (name, &width) in self.table.columns.iter().zip(widths) {
            spans.push(Span::styled(Self::cell(name, width, false), header_style));
            spans.push(Span::styled("│", dim()));
        }

        Line::from(spans)
    }

    fn row_line(row: &[String], widths: &[usize], numeric: &[bool]) -> Line<'a> {
        let mut spans = vec![Span::styled("│", dim())];
        for (i, &width) in widths.iter().enumerate() {
            let value = row.get(i).map(String::as_str).unwrap_or("");
            let right = numeric.get(i).copied().unwrap_or(false);

            let style = if value == "NULL" {
                dim().add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(Self::cell(value, width, right), style));
            spans.push(Span::styled("│", dim()));
        }

        Line::from(spans)
    }

    fn footer(&self) -> String {
        let count = self.table.row_count();
        let plural = if count == 1 { "" } else { "s" };
        match self.table.elapsed {
            Some(elapsed) => format!("{count} row{plural} returned ({}ms)", elapsed.as_millis()),
            None => format!("{count} row{plural} returned"),
        }
    }
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines(area.width as usize);

        for (i, line) in lines.iter().take(area.height as usize).enumerate() {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn orders_table() -> TableData {
        TableData::new(
            vec![
                "order_id".to_string(),
                "city".to_string(),
                "total".to_string(),
            ],
            vec![
                vec![
                    "1001".to_string(),
                    "Portland".to_string(),
                    "95.20".to_string(),
                ],
                vec!["1002".to_string(), "Eugene".to_string(), "NULL".to_string()],
            ],
        )
    }

    #[test]
    fn test_natural_widths_follow_content() {
        let table = orders_table();
        let widths = ResultTable::new(&table).natural_widths();

        assert_eq!(widths, vec![8, 8, 5]);
    }

    #[test]
    fn test_fit_widths_shrinks_the_widest_first() {
        let widths = ResultTable::fit_widths(vec![4, 20], 20);
        assert_eq!(widths, vec![4, 9]);
    }

    #[test]
    fn test_fit_widths_floors_at_the_minimum() {
        let widths = ResultTable::fit_widths(vec![4, 4], 5);
        assert_eq!(widths, vec![4, 4]);
    }

    #[test]
    fn test_numeric_columns() {
        let table = orders_table();
        let numeric = ResultTable::new(&table).numeric_columns();

        assert_eq!(numeric, vec![true, false, true]);
    }

    #[test]
    fn test_clip() {
        assert_eq!(ResultTable::clip("hello", 10), "hello");
        assert_eq!(ResultTable::clip("hello world", 8), "hello w…");
        assert_eq!(ResultTable::clip("hi", 2), "hi");
        assert_eq!(ResultTable::clip("hello", 1), "h");
    }

    #[test]
    fn test_numeric_cells_right_aligned() {
        let line = ResultTable::row_line(
            &["7".to_string(), "west".to_string()],
            &[5, 5],
            &[true, false],
        );
        let rendered: String = line.spans.iter().map(|s| s.content.as_ref()).collect();

        assert_eq!(rendered, "│     7 │ west  │");
    }

    #[test]
    fn test_render_to_lines() {
        let table = orders_table();
        let lines = ResultTable::new(&table).render_to_lines(80);

        // Top border, header, separator, two data rows, bottom border, footer.
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_footer_includes_elapsed_time() {
        let table = orders_table().with_elapsed(Duration::from_millis(23));
        let lines = ResultTable::new(&table).render_to_lines(80);

        let footer: String = lines
            .last()
            .unwrap()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(footer, "2 rows returned (23ms)");
    }

    #[test]
    fn test_empty_table() {
        let table = TableData::default();
        let lines = ResultTable::new(&table).render_to_lines(80);

        assert_eq!(lines.len(), 1);
    }
}
