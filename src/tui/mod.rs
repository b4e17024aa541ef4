//! Terminal user interface for Vouch.
//!
//! The main loop: draw with ratatui, poll crossterm for a key, hand the
//! submitted input to the workbench.

pub mod app;
mod events;
mod ui;
pub mod widgets;

pub use app::App;

use self::app::Focus;
use self::events::KeyPoller;

use crate::app::{FeedItem, InputResult, Workbench};
use crate::error::{Result, VouchError};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::error;

/// Owns the terminal and drives the draw and input loop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keys: KeyPoller,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;

        Ok(Self {
            terminal,
            keys: KeyPoller::new(),
        })
    }

    /// Raw mode plus the alternate screen.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| VouchError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| VouchError::internal(format!("Failed to enter alternate screen: {e}")))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)
            .map_err(|e| VouchError::internal(format!("Failed to create terminal: {e}")))?;

        Ok(terminal)
    }

    /// Puts the terminal back the way the shell expects it.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| VouchError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| VouchError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| VouchError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main TUI event loop.
    pub async fn run(&mut self, workbench: &mut Workbench) -> Result<()> {
        // Restore the terminal on panic so the shell is left usable.
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let mut app = App::new();
        let result = self.run_event_loop(&mut app, workbench).await;

        let _ = panic::take_hook();

        result
    }

    async fn run_event_loop(&mut self, app: &mut App, workbench: &mut Workbench) -> Result<()> {
        loop {
            app.clear_expired_toast();

            self.terminal
                .draw(|frame| ui::render(frame, app, workbench))
                .map_err(|e| VouchError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            // Poll on a blocking thread so the runtime stays free for the
            // workbench's HTTP calls.
            let keys = self.keys;
            let key = tokio::task::spawn_blocking(move || keys.next_key())
                .await
                .map_err(|e| VouchError::internal(format!("Event task failed: {e}")))??;

            if let Some(key) = key {
                self.handle_key(key, app, workbench).await;
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent, app: &mut App, workbench: &mut Workbench) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.running = false;
            }
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.running = false;
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.clear_feed();
                app.show_toast("Feed cleared");
            }
            KeyCode::Tab => {
                app.focus = app.focus.next();
            }
            KeyCode::Esc if app.focus != Focus::Input => {
                app.focus = Focus::Input;
            }
            KeyCode::Esc => {
                app.input.clear();
            }
            KeyCode::Enter if app.focus == Focus::Input => {
                self.submit(app, workbench).await;
            }
            KeyCode::Up if app.focus == Focus::Input => {
                app.recall_up(&workbench.session().history);
            }
            KeyCode::Down if app.focus == Focus::Input => {
                app.recall_down(&workbench.session().history);
            }
            _ if app.focus == Focus::SqlEditor => {
                app.handle_editor_key(key);
                workbench.session_mut().set_edited_sql(app.editor.text.clone());
            }
            _ => {
                app.handle_key(key);
            }
        }
    }

    /// Submits the input to the workbench and folds the result into the feed.
    async fn submit(&mut self, app: &mut App, workbench: &mut Workbench) {
        let Some(input) = app.submit_input() else {
            return;
        };

        app.push_item(FeedItem::Question(input.clone()));
        app.is_processing = true;

        // Draw once so the question is visible while the workbench waits on
        // the network.
        let _ = self
            .terminal
            .draw(|frame| ui::render(frame, app, workbench));

        match workbench.handle_input(&input).await {
            Ok(result) => Self::apply_result(result, app),
            Err(e) => {
                error!(error = %e, "input handling failed");
                app.push_item(FeedItem::Error(e.to_string()));
            }
        }

        app.is_processing = false;
        app.sync_editor(workbench.session().edited_sql());
    }

    fn apply_result(result: InputResult, app: &mut App) {
        match result {
            InputResult::None => {}
            InputResult::Items(items) => app.push_items(items),
            InputResult::Saved { items, name } => {
                app.push_items(items);
                app.show_toast(format!("Saved \"{name}\""));
            }
            InputResult::Clear => {
                app.clear_feed();
                app.show_toast("Feed cleared");
            }
            InputResult::Exit => app.running = false,
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the TUI application.
pub async fn run(mut workbench: Workbench) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.run(&mut workbench).await
}
