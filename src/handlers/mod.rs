//! HTTP request handlers

pub mod analyze;
pub mod estimate;
pub mod health;
pub mod metrics_handler;

// Re-export commonly used types
pub use analyze::AppState;
