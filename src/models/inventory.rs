use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Size class of an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSize {
    Small,
    Medium,
    Large,
}

impl ItemSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSize::Small => "small",
            ItemSize::Medium => "medium",
            ItemSize::Large => "large",
        }
    }
}

/// Category of an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Furniture,
    Appliance,
    Box,
    Other,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Furniture => "furniture",
            ItemCategory::Appliance => "appliance",
            ItemCategory::Box => "box",
            ItemCategory::Other => "other",
        }
    }
}

/// Single item identified in the walkthrough video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u32,
    pub size: ItemSize,
    pub category: ItemCategory,
}

/// Itemized inventory extracted from a walkthrough video (Stage 1 output)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<InventoryItem>,
    /// Estimated total volume. When the model omits it, the downstream
    /// pricing assumes a typical 500 ft³ load.
    #[serde(default = "default_total_volume")]
    pub total_volume_cubic_feet: f64,
    /// Labels like "piano" or "large_wardrobe" that need extra care.
    #[serde(default)]
    pub needs_special_handling: Vec<String>,
}

fn default_total_volume() -> f64 {
    500.0
}

impl Inventory {
    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        for item in &self.items {
            if item.quantity == 0 {
                return Err(AppError::Schema(format!(
                    "item '{}' has quantity 0, expected at least 1",
                    item.name
                )));
            }
        }
        Ok(())
    }

    /// Volume used for staffing and pricing. Out-of-range values from a
    /// hand-crafted request fall back to the 500 ft³ assumption rather
    /// than failing the estimate.
    pub fn effective_volume(&self) -> f64 {
        let v = self.total_volume_cubic_feet;
        if v.is_finite() && v >= 0.0 {
            v
        } else {
            default_total_volume()
        }
    }

    /// Total number of physical pieces across all items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}
