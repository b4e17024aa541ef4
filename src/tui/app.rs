//! Application state for the TUI.
//!
//! Contains the main App struct and related types for managing UI state.
//! Workbench state (session, store) lives outside; this is only what the
//! terminal needs to draw and edit.

use crate::app::FeedItem;
use crate::session::QueryHistory;
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    SqlEditor,
    Feed,
    Sidebar,
}

impl Focus {
    /// Cycles to the next focus panel.
    pub fn next(self) -> Self {
        match self {
            Self::Input => Self::SqlEditor,
            Self::SqlEditor => Self::Feed,
            Self::Feed => Self::Sidebar,
            Self::Sidebar => Self::Input,
        }
    }
}

/// Input state for single line text editing.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current input text.
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text.remove(self.cursor);
        }
    }

    /// Deletes the character at the cursor (delete key).
    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Replaces the content, placing the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Clears the input and returns the previous text.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Editor state for the SQL panel. Like [`InputState`] but line aware, so
/// Enter inserts a newline and the cursor can move between lines.
#[derive(Debug, Default)]
pub struct EditorState {
    pub text: String,
    pub cursor: usize,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn newline(&mut self) {
        self.insert('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor += 1;
        }
    }

    /// Start of the line the cursor is on.
    fn line_start(&self) -> usize {
        self.text[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// End of the line the cursor is on (index of its newline, or text end).
    fn line_end(&self) -> usize {
        self.text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.text.len())
    }

    pub fn move_home(&mut self) {
        self.cursor = self.line_start();
    }

    pub fn move_end(&mut self) {
        self.cursor = self.line_end();
    }

    pub fn move_up(&mut self) {
        let line_start = self.line_start();
        if line_start == 0 {
            return;
        }
        let column = self.cursor - line_start;
        let prev_start = self.text[..line_start - 1]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let prev_len = line_start - 1 - prev_start;
        self.cursor = prev_start + column.min(prev_len);
    }

    pub fn move_down(&mut self) {
        let line_end = self.line_end();
        if line_end == self.text.len() {
            return;
        }
        let column = self.cursor - self.line_start();
        let next_start = line_end + 1;
        let next_len = self.text[next_start..]
            .find('\n')
            .unwrap_or(self.text.len() - next_start);
        self.cursor = next_start + column.min(next_len);
    }

    /// Replaces the content, placing the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    /// Cursor position as (row, column) for on-screen placement.
    pub fn cursor_position(&self) -> (usize, usize) {
        let row = self.text[..self.cursor].matches('\n').count();
        let column = self.cursor - self.line_start();
        (row, column)
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Current focus panel.
    pub focus: Focus,
    /// Question input field state.
    pub input: InputState,
    /// SQL editor state.
    pub editor: EditorState,
    /// Feed transcript.
    pub feed: Vec<FeedItem>,
    /// Feed scroll offset (lines from bottom).
    pub feed_scroll: usize,
    /// Sidebar scroll offset.
    pub sidebar_scroll: usize,
    /// True while a question is being processed.
    pub is_processing: bool,
    /// Active toast, if any.
    toast: Option<(String, Instant)>,
    /// Position while recalling questions from history with Up/Down.
    recall_index: Option<usize>,
}

impl App {
    pub fn new() -> Self {
        let feed = vec![FeedItem::Info(
            "Welcome to Vouch. Ask a question, or type /help for commands.".to_string(),
        )];

        Self {
            running: true,
            focus: Focus::default(),
            input: InputState::new(),
            editor: EditorState::new(),
            feed,
            feed_scroll: 0,
            sidebar_scroll: 0,
            is_processing: false,
            toast: None,
            recall_index: None,
        }
    }

    /// Appends an item to the feed, snapping the view to the bottom.
    pub fn push_item(&mut self, item: FeedItem) {
        self.feed.push(item);
        self.feed_scroll = 0;
    }

    pub fn push_items(&mut self, items: Vec<FeedItem>) {
        for item in items {
            self.push_item(item);
        }
    }

    pub fn clear_feed(&mut self) {
        self.feed.clear();
        self.feed_scroll = 0;
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some((message.into(), Instant::now()));
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.as_ref().map(|(message, _)| message.as_str())
    }

    pub fn clear_expired_toast(&mut self) {
        if let Some((_, shown_at)) = &self.toast {
            if shown_at.elapsed() > TOAST_DURATION {
                self.toast = None;
            }
        }
    }

    /// Takes the input text for submission, if non empty.
    pub fn submit_input(&mut self) -> Option<String> {
        self.recall_index = None;
        if self.input.is_empty() {
            None
        } else {
            Some(self.input.take())
        }
    }

    /// Loads the editor from the session's SQL unless it already matches.
    pub fn sync_editor(&mut self, edited_sql: Option<&str>) {
        match edited_sql {
            Some(sql) if sql != self.editor.text => self.editor.set_text(sql),
            None if !self.editor.is_empty() => self.editor.set_text(""),
            _ => {}
        }
    }

    /// Recalls an older question from the history into the input.
    pub fn recall_up(&mut self, history: &QueryHistory) {
        if history.is_empty() {
            return;
        }
        let next = match self.recall_index {
            None => 0,
            Some(i) => (i + 1).min(history.len() - 1),
        };
        if let Some(question) = history.question_at(next) {
            self.input.set_text(question);
            self.recall_index = Some(next);
        }
    }

    /// Steps back toward the newest question, clearing the input past it.
    pub fn recall_down(&mut self, history: &QueryHistory) {
        match self.recall_index {
            None | Some(0) => {
                self.input.clear();
                self.recall_index = None;
            }
            Some(i) => {
                if let Some(question) = history.question_at(i - 1) {
                    self.input.set_text(question);
                    self.recall_index = Some(i - 1);
                }
            }
        }
    }

    /// Handles editing keys for the focused panel other than the editor.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        match self.focus {
            Focus::Input => match key.code {
                KeyCode::Char(c) => {
                    self.recall_index = None;
                    self.input.insert(c);
                }
                KeyCode::Backspace => self.input.backspace(),
                KeyCode::Delete => self.input.delete(),
                KeyCode::Left => self.input.move_left(),
                KeyCode::Right => self.input.move_right(),
                KeyCode::Home => self.input.move_home(),
                KeyCode::End => self.input.move_end(),
                _ => {}
            },
            Focus::Feed => match key.code {
                KeyCode::Up => self.feed_scroll = self.feed_scroll.saturating_add(1),
                KeyCode::Down => self.feed_scroll = self.feed_scroll.saturating_sub(1),
                KeyCode::PageUp => self.feed_scroll = self.feed_scroll.saturating_add(10),
                KeyCode::PageDown => self.feed_scroll = self.feed_scroll.saturating_sub(10),
                KeyCode::End => self.feed_scroll = 0,
                _ => {}
            },
            Focus::Sidebar => match key.code {
                KeyCode::Up => self.sidebar_scroll = self.sidebar_scroll.saturating_add(1),
                KeyCode::Down => self.sidebar_scroll = self.sidebar_scroll.saturating_sub(1),
                _ => {}
            },
            Focus::SqlEditor => {}
        }
    }

    /// Handles editing keys while the SQL editor has focus.
    pub fn handle_editor_key(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        match key.code {
            KeyCode::Char(c) => self.editor.insert(c),
            KeyCode::Enter => self.editor.newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            _ => {}
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
