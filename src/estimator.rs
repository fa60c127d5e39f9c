//! Stage 2: inventory + logistics to a priced cost estimate
//!
//! Staffing comes from one model call when possible and from the volume
//! rules otherwise, so an estimate is always produced once an inventory
//! exists. The arithmetic itself lives in the pricing module.

use std::time::Instant;

use reqwest::Client;

use crate::config::{GeminiConfig, PricingConfig};
use crate::error::AppError;
use crate::metrics;
use crate::models::estimate::{
    CostEstimate, MoveParameters, StaffingRecommendation, TruckType,
};
use crate::models::gemini::{Content, GenerateContentRequest, Part};
use crate::models::inventory::Inventory;
use crate::parser;
use crate::pricing;
use crate::prompts;
use crate::providers::gemini;

/// Staffing derived purely from the inventory volume and the count of
/// special-handling items. Used whenever the model cannot be consulted.
pub fn fallback_staffing(inventory: &Inventory) -> StaffingRecommendation {
    let v = inventory.effective_volume();

    let movers = if v < 400.0 {
        2
    } else if v < 800.0 {
        3
    } else {
        4
    };

    let truck_type = if v < 400.0 {
        TruckType::Small
    } else if v < 900.0 {
        TruckType::Medium
    } else {
        TruckType::Large
    };

    StaffingRecommendation {
        recommended_movers: movers,
        truck_type: truck_type.as_str().to_string(),
        complexity_hours_add: 0.5 * inventory.needs_special_handling.len() as f64,
        special_notes: String::new(),
    }
}

/// Stage 2 engine: one staffing round trip, then deterministic pricing.
#[derive(Clone)]
pub struct CostEstimator {
    client: Client,
    gemini: GeminiConfig,
    pricing: PricingConfig,
}

impl CostEstimator {
    pub fn new(client: Client, gemini: GeminiConfig, pricing: PricingConfig) -> Self {
        Self {
            client,
            gemini,
            pricing,
        }
    }

    /// Produce a cost estimate for moving `inventory` under `params`.
    ///
    /// Model failures never surface here; only malformed inputs and an
    /// out-of-table truck tier can fail the call.
    pub async fn estimate(
        &self,
        inventory: &Inventory,
        params: &MoveParameters,
    ) -> Result<CostEstimate, AppError> {
        params.validate()?;
        inventory.validate()?;

        let start = Instant::now();
        let staffing = match self.request_staffing(inventory, params).await {
            Ok(staffing) => {
                tracing::debug!(
                    movers = staffing.recommended_movers,
                    truck = %staffing.truck_type,
                    "model staffing accepted"
                );
                staffing
            }
            Err(e) => {
                metrics::record_staffing_fallback();
                tracing::warn!(error = %e, "staffing call failed, using volume rules");
                fallback_staffing(inventory)
            }
        };
        metrics::record_stage_duration("staffing", start.elapsed());

        pricing::compute_estimate(&self.pricing, inventory, params, &staffing)
    }

    async fn request_staffing(
        &self,
        inventory: &Inventory,
        params: &MoveParameters,
    ) -> Result<StaffingRecommendation, AppError> {
        let prompt = prompts::build_staffing_prompt(inventory, params);
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text { text: prompt }],
            }],
        };

        let response = gemini::generate_content(&self.client, &self.gemini, &request).await?;
        let text = response
            .text()
            .ok_or_else(|| AppError::Parse("model reply contained no text".to_string()))?;

        parser::parse_reply(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inventory::{InventoryItem, ItemCategory, ItemSize};

    fn inventory(volume: f64, special: &[&str]) -> Inventory {
        Inventory {
            items: vec![InventoryItem {
                name: "sofa".to_string(),
                quantity: 1,
                size: ItemSize::Large,
                category: ItemCategory::Furniture,
            }],
            total_volume_cubic_feet: volume,
            needs_special_handling: special.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_fallback_small_move() {
        let staffing = fallback_staffing(&inventory(250.0, &[]));
        assert_eq!(staffing.recommended_movers, 2);
        assert_eq!(staffing.truck_type, "small");
        assert_eq!(staffing.complexity_hours_add, 0.0);
        assert_eq!(staffing.special_notes, "");
    }

    #[test]
    fn test_fallback_mid_volume_stays_medium() {
        // 850 ft³ sits above the 800 movers boundary but below the 900
        // truck boundary
        let staffing = fallback_staffing(&inventory(850.0, &["piano"]));
        assert_eq!(staffing.recommended_movers, 4);
        assert_eq!(staffing.truck_type, "medium");
        assert_eq!(staffing.complexity_hours_add, 0.5);
    }

    #[test]
    fn test_fallback_large_move() {
        let staffing = fallback_staffing(&inventory(950.0, &["piano", "safe", "aquarium"]));
        assert_eq!(staffing.recommended_movers, 4);
        assert_eq!(staffing.truck_type, "large");
        assert_eq!(staffing.complexity_hours_add, 1.5);
    }

    #[test]
    fn test_fallback_boundary_values() {
        assert_eq!(fallback_staffing(&inventory(399.9, &[])).truck_type, "small");
        assert_eq!(fallback_staffing(&inventory(400.0, &[])).truck_type, "medium");
        assert_eq!(fallback_staffing(&inventory(899.9, &[])).truck_type, "medium");
        assert_eq!(fallback_staffing(&inventory(900.0, &[])).truck_type, "large");

        assert_eq!(fallback_staffing(&inventory(399.9, &[])).recommended_movers, 2);
        assert_eq!(fallback_staffing(&inventory(400.0, &[])).recommended_movers, 3);
        assert_eq!(fallback_staffing(&inventory(800.0, &[])).recommended_movers, 4);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let inv = inventory(620.0, &["piano", "wardrobe"]);
        assert_eq!(fallback_staffing(&inv), fallback_staffing(&inv));
    }

    #[test]
    fn test_fallback_defaults_bad_volume() {
        // Non-finite volume falls back to the 500 ft³ assumption
        let staffing = fallback_staffing(&inventory(f64::NAN, &[]));
        assert_eq!(staffing.recommended_movers, 3);
        assert_eq!(staffing.truck_type, "medium");
    }

    #[tokio::test]
    async fn test_estimate_rejects_bad_params() {
        let estimator = CostEstimator::new(
            Client::new(),
            GeminiConfig::default(),
            PricingConfig::default(),
        );

        let params = MoveParameters {
            distance_km: -1.0,
            origin_floor: 1,
            destination_floor: 1,
            has_elevator_origin: false,
            has_elevator_destination: false,
        };

        let err = estimator
            .estimate(&inventory(500.0, &[]), &params)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CostEstimation(_)));
    }
}
