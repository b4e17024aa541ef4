//! Vouch - a terminal workbench for AI-assisted SQL with analyst-verified queries.
//!
//! This library exposes the core modules for use in integration tests.

pub mod answer;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod oracle;
pub mod session;
pub mod store;
pub mod tui;
