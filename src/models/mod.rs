//! Data models for the moving-cost estimation pipeline
//!
//! This module contains the typed records flowing between stages:
//! - inventory: items extracted from a walkthrough video (Stage 1 output)
//! - estimate: move parameters, staffing, and the priced cost breakdown
//! - gemini: wire types for the Gemini generateContent and Files APIs

pub mod estimate;
pub mod gemini;
pub mod inventory;

// Re-export commonly used types
pub use estimate::{CostBreakdown, CostEstimate, EstimateCostRequest, MoveParameters, TruckType};
pub use inventory::{Inventory, InventoryItem, ItemCategory, ItemSize};
