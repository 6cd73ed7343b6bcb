//! Response schema for structured node generation
//!
//! Gemini's structured-output mode takes an OpenAPI-subset schema in
//! `response_schema`; the model is then constrained to emit JSON matching
//! it. This is the wire-side twin of [`crate::models::Node`].

use serde_json::{json, Value};

/// Schema for one ledger entry (amount as a decimal string + account).
fn ledger_entry_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "amount": { "type": "STRING", "description": "Decimal amount as a string, e.g. \"1200.00\"" },
            "account": { "type": "STRING" }
        },
        "required": ["amount", "account"]
    })
}

/// Schema for a named double-entry transaction.
fn transaction_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "debits": { "type": "ARRAY", "items": ledger_entry_schema() },
            "credits": { "type": "ARRAY", "items": ledger_entry_schema() }
        },
        "required": ["name", "debits", "credits"]
    })
}

/// Schema for a single financial node.
pub fn node_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "node_name": { "type": "STRING" },
            "constraints": { "type": "ARRAY", "items": { "type": "STRING" } },
            "transaction": { "type": "ARRAY", "items": transaction_schema() },
            "transaction_description": { "type": "STRING" },
            "absolute_start_utc": { "type": "STRING", "format": "date-time" },
            "absolute_end_utc": { "type": "STRING", "format": "date-time", "nullable": true },
            "start_offset_rule": { "type": "STRING", "nullable": true },
            "end_offset_rule": { "type": "STRING", "nullable": true },
            "recurrence_rule": { "type": "STRING", "nullable": true },
            "expected_value": { "type": "NUMBER" }
        },
        "required": [
            "node_name",
            "constraints",
            "transaction",
            "transaction_description",
            "absolute_start_utc",
            "expected_value"
        ],
        "propertyOrdering": [
            "node_name",
            "constraints",
            "transaction",
            "transaction_description",
            "absolute_start_utc",
            "absolute_end_utc",
            "start_offset_rule",
            "end_offset_rule",
            "recurrence_rule",
            "expected_value"
        ]
    })
}

/// Schema for the full structured reply: an ordered sequence of nodes.
pub fn node_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": node_schema()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_list_schema_is_array_of_objects() {
        let schema = node_list_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["type"], "OBJECT");
    }

    #[test]
    fn test_node_schema_requires_core_fields() {
        let schema = node_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for field in [
            "node_name",
            "constraints",
            "transaction",
            "transaction_description",
            "absolute_start_utc",
            "expected_value",
        ] {
            assert!(required.contains(&field), "missing required field {field}");
        }
        // Nullable timing fields must not be required
        assert!(!required.contains(&"absolute_end_utc"));
        assert!(!required.contains(&"recurrence_rule"));
    }

    #[test]
    fn test_property_ordering_matches_node_field_order() {
        let schema = node_schema();
        let ordering: Vec<&str> = schema["propertyOrdering"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(ordering.first(), Some(&"node_name"));
        assert_eq!(ordering.last(), Some(&"expected_value"));
        assert_eq!(ordering.len(), 10);
    }
}
