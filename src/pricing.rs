//! Deterministic pricing arithmetic
//!
//! Everything here is a pure function of the rate table and its inputs,
//! so identical inputs always price identically. The only fallible step
//! is the truck tier lookup, which rejects labels outside the table
//! before any cost is computed.

use crate::config::PricingConfig;
use crate::error::AppError;
use crate::models::estimate::{
    CostBreakdown, CostEstimate, MoveParameters, StaffingRecommendation, TruckType,
};
use crate::models::inventory::Inventory;

/// Round to one decimal place (hours)
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to cents
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Stair floors that incur the per-floor fee. Each side contributes its
/// floors above ground only when that side has no elevator.
fn billable_stair_floors(params: &MoveParameters) -> u32 {
    let mut floors = 0;
    if !params.has_elevator_origin && params.origin_floor > 1 {
        floors += params.origin_floor - 1;
    }
    if !params.has_elevator_destination && params.destination_floor > 1 {
        floors += params.destination_floor - 1;
    }
    floors
}

/// Price a move from an inventory, logistics, and a staffing plan.
///
/// Out-of-range staffing values are normalized here (movers clamped to
/// the 2..=6 crew sizes the rates assume, negative or non-finite extra
/// hours treated as zero) rather than rejected, since they come from a
/// model reply.
pub fn compute_estimate(
    pricing: &PricingConfig,
    inventory: &Inventory,
    params: &MoveParameters,
    staffing: &StaffingRecommendation,
) -> Result<CostEstimate, AppError> {
    // Tier guard runs first: an unknown label must fail before any
    // arithmetic instead of pricing a nonexistent truck.
    let truck_type: TruckType = staffing.truck_type.parse()?;

    let volume = inventory.effective_volume();
    let movers = staffing.recommended_movers.clamp(2, 6);
    let complexity_hours = if staffing.complexity_hours_add.is_finite() {
        staffing.complexity_hours_add.max(0.0)
    } else {
        0.0
    };

    let volume_hours = (volume / 100.0) * pricing.hours_per_100_cubic_feet;
    let estimated_hours = round1(pricing.base_hours + volume_hours + complexity_hours);

    let labor = round2(f64::from(movers) * estimated_hours * pricing.labor_rate_per_hour);
    let truck = pricing.truck_rates.rate(truck_type);
    let fuel = round2(params.distance_km * pricing.fuel_cost_per_km);
    let stairs_fee = f64::from(billable_stair_floors(params)) * pricing.stairs_fee_per_floor;
    let materials = round2(volume * pricing.packing_material_per_cubic_foot);
    // 5% service surcharge over the labor + truck + fuel subtotal
    let other = round2((labor + truck + fuel) * 0.05);

    let total_cost = round2(labor + truck + fuel + stairs_fee + materials + other);
    let cost_range = [round2(total_cost * 0.9), round2(total_cost * 1.1)];

    Ok(CostEstimate {
        total_cost,
        cost_range,
        movers_needed: movers,
        truck_type,
        estimated_hours,
        breakdown: CostBreakdown {
            labor,
            truck,
            fuel,
            materials,
            stairs_fee,
            other,
        },
        special_notes: staffing.special_notes.clone(),
    })
}
