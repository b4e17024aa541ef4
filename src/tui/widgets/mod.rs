//! TUI widgets for Vouch.
//!
//! Contains reusable UI components.

pub mod editor;
pub mod feed;
pub mod header;
pub mod input;
pub mod sidebar;
pub mod table;
pub mod toast;
