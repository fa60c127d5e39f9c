//! Interactive terminal frontend
//!
//! This module provides the wizard-style dashboard that walks a user from a
//! walkthrough video to a saved cost report, talking to a running server
//! through [`client::ApiClient`].

pub mod client;
pub mod ui;

// Re-export commonly used types
pub use client::ApiClient;
pub use ui::{AppAction, DashboardApp};
