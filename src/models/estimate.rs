use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::inventory::Inventory;

/// Truck size tier priced by the rate table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruckType {
    Small,
    Medium,
    Large,
}

impl TruckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruckType::Small => "small",
            TruckType::Medium => "medium",
            TruckType::Large => "large",
        }
    }
}

impl fmt::Display for TruckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TruckType {
    type Err = AppError;

    /// Parse a model-suggested tier label. Case and surrounding
    /// whitespace are tolerated; anything outside the rate table is a
    /// configuration error so it fails before any cost math runs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(TruckType::Small),
            "medium" => Ok(TruckType::Medium),
            "large" => Ok(TruckType::Large),
            other => Err(AppError::Config(format!(
                "unknown truck type '{}', expected small, medium, or large",
                other
            ))),
        }
    }
}

/// Logistics of the move itself, independent of the inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveParameters {
    pub distance_km: f64,
    pub origin_floor: u32,
    pub destination_floor: u32,
    #[serde(default)]
    pub has_elevator_origin: bool,
    #[serde(default)]
    pub has_elevator_destination: bool,
}

impl MoveParameters {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.distance_km.is_finite() || self.distance_km <= 0.0 {
            return Err(AppError::CostEstimation(format!(
                "distance_km must be a positive number, got {}",
                self.distance_km
            )));
        }
        if self.origin_floor == 0 {
            return Err(AppError::CostEstimation(
                "origin_floor must be at least 1 (ground floor)".to_string(),
            ));
        }
        if self.destination_floor == 0 {
            return Err(AppError::CostEstimation(
                "destination_floor must be at least 1 (ground floor)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Staffing suggestion for a move, either model-provided or derived
/// from the volume rules when the model call fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingRecommendation {
    pub recommended_movers: u32,
    /// Raw tier label; validated against the rate table at pricing time.
    pub truck_type: String,
    #[serde(default)]
    pub complexity_hours_add: f64,
    #[serde(default)]
    pub special_notes: String,
}

/// Per-component cost amounts, each already rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub labor: f64,
    pub truck: f64,
    pub fuel: f64,
    pub materials: f64,
    pub stairs_fee: f64,
    pub other: f64,
}

/// Priced result of Stage 2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub total_cost: f64,
    /// [low, high] band of ±10% around the total.
    pub cost_range: [f64; 2],
    pub movers_needed: u32,
    pub truck_type: TruckType,
    pub estimated_hours: f64,
    pub breakdown: CostBreakdown,
    #[serde(default)]
    pub special_notes: String,
}

/// Body of POST /api/v1/estimate-cost: the Stage 1 inventory with the
/// move logistics spliced in at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateCostRequest {
    #[serde(flatten)]
    pub inventory: Inventory,
    #[serde(flatten)]
    pub params: MoveParameters,
}
