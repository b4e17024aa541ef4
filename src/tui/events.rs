//! Keyboard polling for the TUI.

use crate::error::{Result, VouchError};
use crossterm::event::{self, Event, KeyEvent};
use std::time::Duration;

/// Blocking poll for key presses.
///
/// The poll timeout doubles as the redraw tick: a `None` return lets the
/// caller refresh time-based state (toast expiry) while the keyboard is
/// idle.
#[derive(Debug, Clone, Copy)]
pub struct KeyPoller {
    poll_timeout: Duration,
}

impl KeyPoller {
    pub fn new() -> Self {
        Self {
            poll_timeout: Duration::from_millis(100),
        }
    }

    /// Waits up to the poll timeout for a key press.
    ///
    /// Resize and other non-keyboard events come back as `None` too; the
    /// caller redraws after every return, which covers them.
    pub fn next_key(&self) -> Result<Option<KeyEvent>> {
        let ready = event::poll(self.poll_timeout)
            .map_err(|e| VouchError::internal(format!("Failed to poll events: {e}")))?;
        if !ready {
            return Ok(None);
        }

        let event = event::read()
            .map_err(|e| VouchError::internal(format!("Failed to read event: {e}")))?;

        match event {
            Event::Key(key) => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

impl Default for KeyPoller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_poll_timeout() {
        let poller = KeyPoller::new();
        assert_eq!(poller.poll_timeout, Duration::from_millis(100));
    }
}
