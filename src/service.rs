//! Facade wiring the extraction and estimation engines together.
//!
//! Handlers and the CLI talk to [`MovingCostService`] instead of driving the
//! engines directly, so the two-stage video workflow lives in one place.

use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::error::AppError;
use crate::estimator::CostEstimator;
use crate::extractor::{InventoryExtractor, VideoSource};
use crate::models::{CostEstimate, Inventory, MoveParameters};

/// High-level entry point for both stages of the moving-cost workflow.
#[derive(Clone)]
pub struct MovingCostService {
    extractor: InventoryExtractor,
    estimator: CostEstimator,
}

impl MovingCostService {
    /// Build the service from loaded configuration.
    ///
    /// A single HTTP client is shared by both engines so connection pools and
    /// timeouts are configured once.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.gemini.timeout_seconds))
            .build()?;

        Ok(Self {
            extractor: InventoryExtractor::new(client.clone(), config.gemini.clone()),
            estimator: CostEstimator::new(
                client,
                config.gemini.clone(),
                config.pricing.clone(),
            ),
        })
    }

    /// Stage 1: extract a furniture inventory from a walkthrough video.
    pub async fn analyze_video(
        &self,
        video: &VideoSource,
        home_type: &str,
        room_count: u32,
    ) -> Result<Inventory, AppError> {
        self.extractor.extract(video, home_type, room_count).await
    }

    /// Stage 2: price an inventory for the given move logistics.
    pub async fn estimate_cost(
        &self,
        inventory: &Inventory,
        params: &MoveParameters,
    ) -> Result<CostEstimate, AppError> {
        self.estimator.estimate(inventory, params).await
    }

    /// Run both stages back to back, returning the intermediate inventory
    /// alongside the final estimate.
    pub async fn estimate_from_video(
        &self,
        video: &VideoSource,
        home_type: &str,
        room_count: u32,
        params: &MoveParameters,
    ) -> Result<(Inventory, CostEstimate), AppError> {
        let inventory = self.analyze_video(video, home_type, room_count).await?;
        let estimate = self.estimate_cost(&inventory, params).await?;
        Ok((inventory, estimate))
    }
}
