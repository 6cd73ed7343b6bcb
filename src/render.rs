//! Response handling and terminal rendering
//!
//! Parses structured replies into typed nodes and renders them in a fixed
//! block layout. Pure string builders so the output is testable; the
//! command loop does the actual printing.

use crate::error::AssistantError;
use crate::models::Node;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Parse a structured reply into an ordered sequence of nodes.
///
/// Tolerates a markdown ```json fence around the payload. Any failure
/// carries the raw payload for diagnosis.
pub fn parse_nodes(raw: &str) -> crate::Result<Vec<Node>> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str::<Vec<Node>>(cleaned).map_err(|e| AssistantError::Parse {
        reason: e.to_string(),
        raw: raw.to_string(),
    })
}

/// Render the full `[CREATED] ... [COMPLETE]` block for a node batch.
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[CREATED] {} nodes:", nodes.len());

    for (i, node) in nodes.iter().enumerate() {
        let _ = writeln!(out, "\n── node {} ──", i + 1);
        render_node(node, &mut out);
    }

    let _ = write!(out, "\n[COMPLETE] {} nodes created.", nodes.len());
    out
}

/// One block per node, fields in declaration order, each exactly once.
/// Absent optional fields print as "-" so the layout never shifts.
fn render_node(node: &Node, out: &mut String) {
    let _ = writeln!(out, "node_name: {}", node.node_name);

    let _ = writeln!(out, "constraints:");
    if node.constraints.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for constraint in &node.constraints {
        let _ = writeln!(out, "  - {}", constraint);
    }

    let _ = writeln!(out, "transaction:");
    if node.transaction.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for tx in &node.transaction {
        let _ = writeln!(out, "  - {}", tx.name);
        let _ = writeln!(out, "      debits:");
        for entry in &tx.debits {
            let _ = writeln!(out, "        {} -> {}", entry.amount, entry.account);
        }
        let _ = writeln!(out, "      credits:");
        for entry in &tx.credits {
            let _ = writeln!(out, "        {} -> {}", entry.amount, entry.account);
        }
    }

    let _ = writeln!(
        out,
        "transaction_description: {}",
        node.transaction_description
    );
    let _ = writeln!(
        out,
        "absolute_start_utc: {}",
        format_timestamp(&node.absolute_start_utc)
    );
    let _ = writeln!(
        out,
        "absolute_end_utc: {}",
        node.absolute_end_utc
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string())
    );
    let _ = writeln!(
        out,
        "start_offset_rule: {}",
        node.start_offset_rule.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "end_offset_rule: {}",
        node.end_offset_rule.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "recurrence_rule: {}",
        node.recurrence_rule.as_deref().unwrap_or("-")
    );
    let _ = writeln!(out, "expected_value: {}", node.expected_value);
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render thought-trace lines with a distinct prefix. Presentation only,
/// never parsed.
pub fn render_thoughts(thoughts: &[String]) -> String {
    let mut out = String::new();
    for thought in thoughts {
        for line in thought.lines() {
            let _ = writeln!(out, "[thought] {}", line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LedgerEntry, Transaction};
    use chrono::TimeZone;

    fn sample_node(name: &str) -> Node {
        Node {
            node_name: name.to_string(),
            constraints: vec!["lease signed".to_string()],
            transaction: vec![Transaction {
                name: "Rent payment".to_string(),
                debits: vec![LedgerEntry {
                    amount: "1200.00".to_string(),
                    account: "Rent Expense".to_string(),
                }],
                credits: vec![LedgerEntry {
                    amount: "1200.00".to_string(),
                    account: "Cash".to_string(),
                }],
            }],
            transaction_description: "Monthly office rent".to_string(),
            absolute_start_utc: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            absolute_end_utc: None,
            start_offset_rule: None,
            end_offset_rule: None,
            recurrence_rule: Some("FREQ=MONTHLY".to_string()),
            expected_value: 1200.0,
        }
    }

    #[test]
    fn test_parse_nodes_valid_payload() {
        let payload = serde_json::to_string(&vec![sample_node("Office Rent")]).unwrap();
        let nodes = parse_nodes(&payload).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].node_name, "Office Rent");
    }

    #[test]
    fn test_parse_nodes_strips_markdown_fence() {
        let payload = serde_json::to_string(&vec![sample_node("Office Rent")]).unwrap();
        let fenced = format!("```json\n{}\n```", payload);
        let nodes = parse_nodes(&fenced).unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_parse_nodes_failure_reports_raw_payload() {
        let raw = r#"{"not": "a node list"}"#;
        let err = parse_nodes(raw).unwrap_err();
        match err {
            AssistantError::Parse { raw: reported, .. } => assert_eq!(reported, raw),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_render_every_field_exactly_once_in_order() {
        let output = render_nodes(&[sample_node("Office Rent")]);

        let labels = [
            "node_name:",
            "constraints:",
            "transaction:",
            "transaction_description:",
            "absolute_start_utc:",
            "absolute_end_utc:",
            "start_offset_rule:",
            "end_offset_rule:",
            "recurrence_rule:",
            "expected_value:",
        ];

        let mut last_pos = 0;
        for label in labels {
            let pos = output.find(label).unwrap_or_else(|| panic!("missing {label}"));
            assert!(pos > last_pos || last_pos == 0, "{label} out of order");
            assert_eq!(
                output.matches(label).count(),
                1,
                "{label} must appear exactly once"
            );
            last_pos = pos;
        }

        // Absent optionals render as "-"
        assert!(output.contains("absolute_end_utc: -"));
        assert!(output.contains("start_offset_rule: -"));
        assert!(output.contains("recurrence_rule: FREQ=MONTHLY"));
    }

    #[test]
    fn test_render_header_and_footer_counts() {
        let nodes = vec![
            sample_node("Rent"),
            sample_node("Payroll"),
            sample_node("Marketing"),
        ];
        let output = render_nodes(&nodes);
        assert!(output.starts_with("[CREATED] 3 nodes:"));
        assert!(output.ends_with("[COMPLETE] 3 nodes created."));
        assert_eq!(output.matches("── node ").count(), 3);
    }

    #[test]
    fn test_amount_strings_survive_round_trip() {
        let payload = r#"[{
            "node_name": "Rent",
            "constraints": [],
            "transaction": [{
                "name": "Rent payment",
                "debits": [{"amount": "1200.00", "account": "Rent Expense"}],
                "credits": [{"amount": "1200.00", "account": "Cash"}]
            }],
            "transaction_description": "rent",
            "absolute_start_utc": "2026-01-01T00:00:00Z",
            "expected_value": 1200.0
        }]"#;
        let nodes = parse_nodes(payload).unwrap();
        let output = render_nodes(&nodes);
        // Printed as the string "1200.00", not a coerced 1200
        assert!(output.contains("1200.00 -> Rent Expense"));
        assert!(output.contains("1200.00 -> Cash"));
    }

    #[test]
    fn test_render_thoughts_prefixes_each_line() {
        let thoughts = vec!["first line\nsecond line".to_string(), "third".to_string()];
        let output = render_thoughts(&thoughts);
        assert_eq!(output.matches("[thought] ").count(), 3);
        assert!(output.contains("[thought] second line"));
    }
}
