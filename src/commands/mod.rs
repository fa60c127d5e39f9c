//! Command implementations for the CLI
//!
//! This module contains the implementation of all CLI commands:
//! - serve: Start the estimator API server
//! - estimate: Run the two-stage workflow once and print the report
//! - dashboard: Launch the interactive terminal frontend
//! - config: Configuration display and validation

pub mod config;
pub mod dashboard;
pub mod estimate;
pub mod serve;
