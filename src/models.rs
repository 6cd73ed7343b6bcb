//! Core data models for generated financial nodes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//
// ================= Ledger =================
//

/// One debit or credit line: an amount paired with an account.
///
/// The amount is carried as a decimal string end-to-end and is never
/// coerced to a float, so "1200.00" prints back as "1200.00".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub amount: String,
    pub account: String,
}

/// A named set of debit and credit ledger entries.
///
/// Double-entry balance (sum of debits == sum of credits) is intended but
/// not enforced here; enforcement belongs to the downstream consumer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub name: String,
    pub debits: Vec<LedgerEntry>,
    pub credits: Vec<LedgerEntry>,
}

//
// ================= Node =================
//

/// A generated unit describing one financial event or rule, bundling
/// transactions, constraints, and timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub node_name: String,
    pub constraints: Vec<String>,
    pub transaction: Vec<Transaction>,
    pub transaction_description: String,
    pub absolute_start_utc: DateTime<Utc>,
    #[serde(default)]
    pub absolute_end_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_offset_rule: Option<String>,
    #[serde(default)]
    pub end_offset_rule: Option<String>,
    #[serde(default)]
    pub recurrence_rule: Option<String>,
    pub expected_value: f64,
}
