//! Prompt templates for the two inference stages
//!
//! Both prompts ask for bare JSON in a fixed shape; the JSON examples
//! double as the schema the parser expects. Keep field names here in
//! sync with the serde models.

use crate::models::estimate::MoveParameters;
use crate::models::inventory::Inventory;

/// Build the Stage 1 prompt: turn a walkthrough video into an inventory.
///
/// The home context steers quantity estimates (a 2-room apartment and a
/// 6-room house imply very different counts for the same footage).
pub fn build_inventory_prompt(home_type: &str, room_count: u32) -> String {
    format!(
        r#"Analyze this home moving video and create an inventory list.

Context:
- Home type: {home_type}
- Number of rooms: {room_count}

Instructions:
1. Identify ALL furniture, appliances, and household items visible in the video
2. Count the quantity of each item
3. Categorize size as: large, medium, or small
4. Categorize type as: furniture, appliance, box, or other
5. Estimate total volume in cubic feet
6. Flag any items needing special handling (piano, large wardrobe, fragile electronics, etc.)

Return ONLY a valid JSON object in this exact format (no markdown, no explanation):
{{
  "items": [
    {{"name": "sofa", "quantity": 1, "size": "large", "category": "furniture"}},
    {{"name": "dining table", "quantity": 1, "size": "large", "category": "furniture"}}
  ],
  "total_volume_cubic_feet": 800,
  "needs_special_handling": ["piano", "large_wardrobe"]
}}"#
    )
}

/// Build the Stage 2 prompt: staffing suggestions for a known inventory.
pub fn build_staffing_prompt(inventory: &Inventory, params: &MoveParameters) -> String {
    let inventory_json =
        serde_json::to_string_pretty(inventory).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"Analyze this moving inventory and provide intelligent estimates.

Inventory:
{inventory_json}

Move Details:
- Distance: {distance} km
- Origin floor: {origin_floor} (Elevator: {elevator_origin})
- Destination floor: {destination_floor} (Elevator: {elevator_destination})

Based on the items, especially heavy/special items, provide:
1. Recommended number of movers (2-6 people)
2. Truck type needed: small (up to 400 cubic feet), medium (400-900), large (900+)
3. Additional hours needed beyond base time due to item complexity
4. Any special handling notes

Return ONLY a valid JSON object:
{{
  "recommended_movers": 3,
  "truck_type": "medium",
  "complexity_hours_add": 1.5,
  "special_notes": "Piano requires extra care and time"
}}"#,
        distance = params.distance_km,
        origin_floor = params.origin_floor,
        elevator_origin = params.has_elevator_origin,
        destination_floor = params.destination_floor,
        elevator_destination = params.has_elevator_destination,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inventory::{InventoryItem, ItemCategory, ItemSize};

    fn sample_inventory() -> Inventory {
        Inventory {
            items: vec![InventoryItem {
                name: "piano".to_string(),
                quantity: 1,
                size: ItemSize::Large,
                category: ItemCategory::Other,
            }],
            total_volume_cubic_feet: 750.0,
            needs_special_handling: vec!["piano".to_string()],
        }
    }

    #[test]
    fn test_inventory_prompt_embeds_context() {
        let prompt = build_inventory_prompt("house", 5);
        assert!(prompt.contains("Home type: house"));
        assert!(prompt.contains("Number of rooms: 5"));
    }

    #[test]
    fn test_inventory_prompt_carries_schema_example() {
        let prompt = build_inventory_prompt("apartment", 3);
        assert!(prompt.contains(r#""total_volume_cubic_feet": 800"#));
        assert!(prompt.contains(r#""needs_special_handling""#));
        assert!(prompt.contains("furniture, appliance, box, or other"));
        assert!(prompt.contains("Return ONLY a valid JSON object"));
    }

    #[test]
    fn test_staffing_prompt_embeds_inventory_and_logistics() {
        let params = MoveParameters {
            distance_km: 18.5,
            origin_floor: 3,
            destination_floor: 1,
            has_elevator_origin: false,
            has_elevator_destination: true,
        };
        let prompt = build_staffing_prompt(&sample_inventory(), &params);

        assert!(prompt.contains(r#""name": "piano""#));
        assert!(prompt.contains("Distance: 18.5 km"));
        assert!(prompt.contains("Origin floor: 3 (Elevator: false)"));
        assert!(prompt.contains("Destination floor: 1 (Elevator: true)"));
        assert!(prompt.contains(r#""recommended_movers": 3"#));
    }

    #[test]
    fn test_staffing_prompt_names_tier_boundaries() {
        let params = MoveParameters {
            distance_km: 5.0,
            origin_floor: 1,
            destination_floor: 1,
            has_elevator_origin: false,
            has_elevator_destination: false,
        };
        let prompt = build_staffing_prompt(&sample_inventory(), &params);
        assert!(prompt.contains("small (up to 400 cubic feet), medium (400-900), large (900+)"));
    }
}
