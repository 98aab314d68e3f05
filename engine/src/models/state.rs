//! Ledger State
//!
//! Holds the single in-memory record collection and the system-state
//! singleton (operating status, ledger integrity, attack flag, budget).
//!
//! # Critical Invariants
//!
//! 1. **ID Uniqueness**: Record IDs are unique and monotone in insertion order
//! 2. **Chain Linkage**: previous/current tokens link in creation order,
//!    except while an attack simulation is active
//! 3. **Wholesale Replacement**: records are never deleted individually; the
//!    batch is replaced as a whole on dataset load or logout

use crate::models::record::{LedgerRecord, RecordStatus};
use serde::{Deserialize, Serialize};

/// System operating status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SystemStatus {
    Active,
    Paused,
    Frozen,
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemStatus::Active => write!(f, "ACTIVE"),
            SystemStatus::Paused => write!(f, "PAUSED"),
            SystemStatus::Frozen => write!(f, "FROZEN"),
        }
    }
}

/// Session-scoped system state singleton
///
/// `ledger_integrity` is a coarse health percentage, not a cryptographic
/// proof; only attack/recovery transitions move it away from nominal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    status: SystemStatus,
    ledger_integrity: f64,
    under_attack: bool,
    remaining_budget: i64,
    last_budget: Option<i64>,
}

impl SystemState {
    /// Nominal ledger integrity percentage
    pub const NOMINAL_INTEGRITY: f64 = 99.7;

    /// Get operating status
    pub fn status(&self) -> SystemStatus {
        self.status
    }

    /// Get ledger integrity percentage
    pub fn ledger_integrity(&self) -> f64 {
        self.ledger_integrity
    }

    /// Check attack flag
    pub fn under_attack(&self) -> bool {
        self.under_attack
    }

    /// Leftover budget from the most recent allocation run (0 before any)
    pub fn remaining_budget(&self) -> i64 {
        self.remaining_budget
    }

    /// Budget supplied to the most recent global allocation, if any
    pub fn last_budget(&self) -> Option<i64> {
        self.last_budget
    }

    pub(crate) fn set_status(&mut self, status: SystemStatus) {
        self.status = status;
    }

    pub(crate) fn set_integrity(&mut self, integrity: f64) {
        self.ledger_integrity = integrity;
    }

    pub(crate) fn set_under_attack(&mut self, under_attack: bool) {
        self.under_attack = under_attack;
    }

    pub(crate) fn set_remaining_budget(&mut self, remaining: i64) {
        self.remaining_budget = remaining.max(0);
    }

    pub(crate) fn set_last_budget(&mut self, budget: i64) {
        self.last_budget = Some(budget.max(0));
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self {
            status: SystemStatus::Active,
            ledger_integrity: Self::NOMINAL_INTEGRITY,
            under_attack: false,
            remaining_budget: 0,
            last_budget: None,
        }
    }
}

/// Complete ledger state: the record batch plus the system singleton
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerState {
    records: Vec<LedgerRecord>,
    system: SystemState,
}

impl LedgerState {
    /// Create an empty state with nominal system values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record collection in creation order
    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    /// Get the system singleton
    pub fn system(&self) -> &SystemState {
        &self.system
    }

    /// Get mutable system singleton (coordinator only)
    pub(crate) fn system_mut(&mut self) -> &mut SystemState {
        &mut self.system
    }

    /// Replace the record collection wholesale (coordinator only)
    pub(crate) fn replace_records(&mut self, records: Vec<LedgerRecord>) {
        self.records = records;
    }

    /// Replace both halves at once (coordinator only)
    pub(crate) fn replace(&mut self, records: Vec<LedgerRecord>, system: SystemState) {
        self.records = records;
        self.system = system;
    }

    /// Number of records in the batch
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no batch is loaded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Next sequential record ID (`TXN-%04d`)
    ///
    /// IDs are never reused: records are only removed by wholesale
    /// replacement, which restarts the sequence.
    pub(crate) fn next_record_id(&self) -> String {
        format!("TXN-{:04}", self.records.len() + 1)
    }

    /// Chain-link token of the newest record, or the genesis token
    pub(crate) fn tail_hash(&self) -> String {
        self.records
            .last()
            .map(|record| record.current_hash().to_string())
            .unwrap_or_else(|| crate::integrity::GENESIS_TOKEN.to_string())
    }

    /// Sum of amounts over the whole batch
    pub fn total_amount(&self) -> i64 {
        self.records.iter().map(|record| record.amount()).sum()
    }

    /// Sum of a citizen's non-blocked amounts
    ///
    /// Input to the scoped eligibility recalculation when no global budget
    /// has been applied yet.
    pub fn non_blocked_amount_for(&self, citizen_hash: &str) -> i64 {
        self.records
            .iter()
            .filter(|record| {
                record.citizen_hash() == citizen_hash && record.status() != RecordStatus::Blocked
            })
            .map(|record| record.amount())
            .sum()
    }

    /// True when at least one record belongs to the given citizen
    pub fn has_citizen(&self, citizen_hash: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.citizen_hash() == citizen_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::IncomeTier;
    use chrono::Utc;

    fn record(id: &str, citizen: &str, amount: i64) -> LedgerRecord {
        LedgerRecord::new(
            id.to_string(),
            citizen.to_string(),
            "PM-KISAN".to_string(),
            "RG-01".to_string(),
            IncomeTier::Low,
            amount,
            Utc::now(),
            "0000000000000000".to_string(),
            "aaaaaaaaaaaa".to_string(),
        )
    }

    #[test]
    fn test_new_state_is_nominal() {
        let state = LedgerState::new();

        assert!(state.is_empty());
        assert_eq!(state.system().status(), SystemStatus::Active);
        assert_eq!(state.system().ledger_integrity(), SystemState::NOMINAL_INTEGRITY);
        assert!(!state.system().under_attack());
        assert_eq!(state.system().remaining_budget(), 0);
    }

    #[test]
    fn test_next_record_id_follows_batch_size() {
        let mut state = LedgerState::new();
        assert_eq!(state.next_record_id(), "TXN-0001");

        state.replace_records(vec![record("TXN-0001", "CIT-A", 100)]);
        assert_eq!(state.next_record_id(), "TXN-0002");
    }

    #[test]
    fn test_non_blocked_amount_for_citizen() {
        let mut state = LedgerState::new();
        let mut blocked = record("TXN-0002", "CIT-A", 700);
        blocked.set_status(RecordStatus::Blocked);

        state.replace_records(vec![
            record("TXN-0001", "CIT-A", 300),
            blocked,
            record("TXN-0003", "CIT-B", 900),
        ]);

        assert_eq!(state.non_blocked_amount_for("CIT-A"), 300);
        assert_eq!(state.non_blocked_amount_for("CIT-B"), 900);
        assert_eq!(state.non_blocked_amount_for("CIT-C"), 0);
    }
}
