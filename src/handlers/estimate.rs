use crate::{error::AppError, metrics, models::CostEstimate, models::EstimateCostRequest};
use axum::{extract::State, Json};
use std::time::Instant;

pub use crate::handlers::analyze::AppState;

/// Handle /api/v1/estimate-cost endpoint
///
/// Takes an inventory plus move logistics and returns the priced estimate.
pub async fn handle_estimate_cost(
    State(state): State<AppState>,
    Json(request): Json<EstimateCostRequest>,
) -> Result<Json<CostEstimate>, AppError> {
    let start = Instant::now();
    metrics::record_request("estimate_cost");

    tracing::info!(
        items = request.inventory.items.len(),
        volume = request.inventory.total_volume_cubic_feet,
        distance_km = request.params.distance_km,
        "Handling cost estimate request"
    );

    let estimate = state
        .service
        .estimate_cost(&request.inventory, &request.params)
        .await?;

    tracing::info!(
        total_cost = estimate.total_cost,
        movers = estimate.movers_needed,
        truck = %estimate.truck_type,
        duration_ms = start.elapsed().as_millis() as u64,
        "Cost estimate complete"
    );

    Ok(Json(estimate))
}
