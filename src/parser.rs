//! Parsing of model text replies into structured values
//!
//! Both inference stages ask for bare JSON, but models still wrap replies
//! in markdown code fences often enough that the parser has to tolerate
//! one. Anything else is rejected strictly.

use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Parse a model reply into a JSON value, stripping one wrapping
/// markdown fence (with or without a `json` language tag) if present.
pub fn parse_json_reply(raw: &str) -> Result<serde_json::Value, AppError> {
    let text = strip_code_fence(raw.trim()).trim();
    serde_json::from_str(text)
        .map_err(|e| AppError::Parse(format!("model reply is not valid JSON: {}", e)))
}

/// Parse a model reply into a typed record.
pub fn parse_reply<T: DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    let value = parse_json_reply(raw)?;
    serde_json::from_value(value)
        .map_err(|e| AppError::Schema(format!("model reply does not match expected shape: {}", e)))
}

/// Return the content inside the first fence pair, the content after a
/// lone opening fence, or the input untouched when no fence leads it.
fn strip_code_fence(text: &str) -> &str {
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::estimate::StaffingRecommendation;
    use crate::models::inventory::Inventory;

    #[test]
    fn test_parses_bare_json() {
        let value = parse_json_reply(r#"{"total_volume_cubic_feet": 800}"#).unwrap();
        assert_eq!(value["total_volume_cubic_feet"], 800);
    }

    #[test]
    fn test_parses_fenced_json() {
        let raw = "```\n{\"items\": []}\n```";
        let value = parse_json_reply(raw).unwrap();
        assert!(value["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_parses_json_tagged_fence() {
        let raw = "```json\n{\"recommended_movers\": 4, \"truck_type\": \"large\"}\n```";
        let staffing: StaffingRecommendation = parse_reply(raw).unwrap();
        assert_eq!(staffing.recommended_movers, 4);
        assert_eq!(staffing.truck_type, "large");
    }

    #[test]
    fn test_parses_fence_without_closing() {
        let raw = "```json\n{\"a\": 1}";
        let value = parse_json_reply(raw).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_tolerates_surrounding_whitespace() {
        let raw = "  \n```json\n {\"a\": 1} \n```\n  ";
        let value = parse_json_reply(raw).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_rejects_prose() {
        let err = parse_json_reply("Sure! Here is the inventory you asked for.").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_rejects_empty_reply() {
        assert!(parse_json_reply("").is_err());
        assert!(parse_json_reply("``` ```").is_err());
    }

    #[test]
    fn test_typed_parse_reports_schema_mismatch() {
        // Valid JSON, wrong shape for an inventory
        let err = parse_reply::<Inventory>(r#"{"items": "not a list"}"#).unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn test_full_inventory_reply() {
        let raw = r#"```json
{
  "items": [
    {"name": "sofa", "quantity": 1, "size": "large", "category": "furniture"},
    {"name": "dining table", "quantity": 1, "size": "large", "category": "furniture"}
  ],
  "total_volume_cubic_feet": 800,
  "needs_special_handling": ["piano", "large_wardrobe"]
}
```"#;
        let inventory: Inventory = parse_reply(raw).unwrap();
        assert_eq!(inventory.items.len(), 2);
        assert_eq!(inventory.total_volume_cubic_feet, 800.0);
        assert_eq!(inventory.needs_special_handling.len(), 2);
    }
}
