//! Integration tests for Vouch.
//!
//! These drive the workbench through its public API with mock upstreams.

pub mod assistant_test;
pub mod store_test;
pub mod validator_test;
