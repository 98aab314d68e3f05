//! Ledger record model
//!
//! Represents one welfare claim transaction in the in-memory batch.
//! Each record has:
//! - A sequential identifier (`TXN-%04d`, assigned in creation order)
//! - An opaque citizen identity token (deliberately not unique - duplicates
//!   across regions are the fraud signal)
//! - Scheme, region code, income tier and amount
//! - A risk score (0-100), mutated only by attack/recovery transitions
//! - A status (pending/approved/blocked), written only by the rule components
//! - A structured audit trail keyed by rule name
//! - A previous/current chain-link token pair
//!
//! The chain tokens are opaque random identifiers, NOT content-derived
//! digests. Linkage order is the invariant, not verifiability.
//!
//! CRITICAL: All money values are i64 (whole rupees)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Income tier of the claiming household
///
/// Ordinal rank LOW < MEDIUM < HIGH; a lower rank means a higher priority
/// during budget allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncomeTier {
    Low,
    Medium,
    High,
}

impl IncomeTier {
    /// Ordinal rank used for allocation ordering (LOW=0, MEDIUM=1, HIGH=2)
    pub fn rank(&self) -> u8 {
        match self {
            IncomeTier::Low => 0,
            IncomeTier::Medium => 1,
            IncomeTier::High => 2,
        }
    }

    /// Parse a tier label case-insensitively; `None` for anything else
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "LOW" => Some(IncomeTier::Low),
            "MEDIUM" => Some(IncomeTier::Medium),
            "HIGH" => Some(IncomeTier::High),
            _ => None,
        }
    }
}

/// Record status
///
/// Transitions are governed exclusively by the Cluster Detector and the
/// Budget Allocator; records are created `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Approved,
    Blocked,
}

/// One entry in a record's audit trail
///
/// Entries are keyed by rule name: re-applying a rule overwrites its own
/// entry rather than appending a duplicate, so rule evaluation is idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Name of the rule that produced the note
    pub rule: String,
    /// Human-readable explanation
    pub note: String,
}

/// One welfare claim transaction in the ledger batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Sequential identifier, format TXN-%04d, never reused
    id: String,

    /// Opaque citizen identity token (uppercased)
    citizen_hash: String,

    /// Welfare scheme name
    scheme: String,

    /// Administrative region token, normalized to uppercase
    region_code: String,

    /// Income tier used for allocation priority
    income_tier: IncomeTier,

    /// Claim amount (i64 whole rupees, non-negative)
    amount: i64,

    /// Risk score 0-100
    risk_score: u8,

    /// Creation/claim time; tie-breaker during allocation (earlier wins)
    timestamp: DateTime<Utc>,

    /// Current status
    status: RecordStatus,

    /// Structured audit trail, one entry per rule
    audit_log: Vec<AuditEntry>,

    /// Chain-link token of the predecessor record
    previous_hash: String,

    /// Chain-link token of this record
    current_hash: String,

    /// True iff this citizen identity spans >= 2 region codes in the batch
    cluster_flag: bool,
}

impl LedgerRecord {
    /// Create a new pending record
    ///
    /// Normalizes the region code and citizen identity to uppercase.
    ///
    /// # Panics
    /// Panics if amount is negative
    ///
    /// # Example
    /// ```
    /// use chrono::Utc;
    /// use welfare_ledger_core_rs::{IncomeTier, LedgerRecord, RecordStatus};
    ///
    /// let record = LedgerRecord::new(
    ///     "TXN-0001".to_string(),
    ///     "CIT-A1B2C3D4".to_string(),
    ///     "PM-KISAN".to_string(),
    ///     "rg-01".to_string(),
    ///     IncomeTier::Low,
    ///     2_000,
    ///     Utc::now(),
    ///     "0000000000000000".to_string(),
    ///     "4fd2a91b03ce".to_string(),
    /// );
    ///
    /// assert_eq!(record.status(), RecordStatus::Pending);
    /// assert_eq!(record.region_code(), "RG-01");
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        citizen_hash: String,
        scheme: String,
        region_code: String,
        income_tier: IncomeTier,
        amount: i64,
        timestamp: DateTime<Utc>,
        previous_hash: String,
        current_hash: String,
    ) -> Self {
        assert!(amount >= 0, "amount must be non-negative");

        Self {
            id,
            citizen_hash: citizen_hash.trim().to_uppercase(),
            scheme,
            region_code: region_code.trim().to_uppercase(),
            income_tier,
            amount,
            risk_score: 0,
            timestamp,
            status: RecordStatus::Pending,
            audit_log: Vec::new(),
            previous_hash,
            current_hash,
            cluster_flag: false,
        }
    }

    /// Set the risk score (builder pattern); capped at 100
    pub fn with_risk_score(mut self, risk_score: u8) -> Self {
        self.risk_score = risk_score.min(100);
        self
    }

    /// Set the creation-time status (builder pattern)
    ///
    /// Only ingestion may use this: after creation, status is written solely
    /// by the rule components.
    pub(crate) fn with_initial_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach an initial audit note (builder pattern)
    pub(crate) fn with_audit_note(mut self, rule: &str, note: &str) -> Self {
        self.annotate(rule, note);
        self
    }

    /// Get record ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get citizen identity token
    pub fn citizen_hash(&self) -> &str {
        &self.citizen_hash
    }

    /// Get scheme name
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Get region code (uppercase)
    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    /// Get income tier
    pub fn income_tier(&self) -> IncomeTier {
        self.income_tier
    }

    /// Get claim amount (i64 whole rupees)
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Get risk score (0-100)
    pub fn risk_score(&self) -> u8 {
        self.risk_score
    }

    /// Get creation timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Get current status
    pub fn status(&self) -> RecordStatus {
        self.status
    }

    /// Get the structured audit trail
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    /// Render the audit trail as one display string
    pub fn explanation(&self) -> String {
        self.audit_log
            .iter()
            .map(|entry| entry.note.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Get predecessor chain-link token
    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    /// Get this record's chain-link token
    pub fn current_hash(&self) -> &str {
        &self.current_hash
    }

    /// Get cluster flag
    pub fn cluster_flag(&self) -> bool {
        self.cluster_flag
    }

    /// Check if record is pending
    pub fn is_pending(&self) -> bool {
        self.status == RecordStatus::Pending
    }

    /// Check if record is blocked
    pub fn is_blocked(&self) -> bool {
        self.status == RecordStatus::Blocked
    }

    /// Set status (rule components only)
    pub(crate) fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }

    /// Set cluster flag (Cluster Detector only)
    pub(crate) fn set_cluster_flag(&mut self, flag: bool) {
        self.cluster_flag = flag;
    }

    /// Upsert an audit note for the given rule
    ///
    /// If the rule already annotated this record, its note is replaced in
    /// place; the trail never grows from re-applying the same rule.
    pub(crate) fn annotate(&mut self, rule: &str, note: &str) {
        match self.audit_log.iter_mut().find(|entry| entry.rule == rule) {
            Some(entry) => entry.note = note.to_string(),
            None => self.audit_log.push(AuditEntry {
                rule: rule.to_string(),
                note: note.to_string(),
            }),
        }
    }

    /// Increase risk score, clamped to 100
    pub(crate) fn raise_risk(&mut self, delta: u8) {
        self.risk_score = self.risk_score.saturating_add(delta).min(100);
    }

    /// Decrease risk score, floored at 0
    pub(crate) fn lower_risk(&mut self, delta: u8) {
        self.risk_score = self.risk_score.saturating_sub(delta);
    }

    /// Overwrite the predecessor chain-link token
    ///
    /// Used only by the integrity module: attack corruption and recovery
    /// re-linking are the sole writers.
    pub(crate) fn set_previous_hash(&mut self, token: String) {
        self.previous_hash = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LedgerRecord {
        LedgerRecord::new(
            "TXN-0001".to_string(),
            "cit-a1b2c3d4".to_string(),
            "PM-KISAN".to_string(),
            "rg-01".to_string(),
            IncomeTier::Low,
            2_000,
            Utc::now(),
            "0000000000000000".to_string(),
            "4fd2a91b03ce".to_string(),
        )
    }

    #[test]
    fn test_new_record_normalizes_and_defaults() {
        let record = record();

        assert_eq!(record.citizen_hash(), "CIT-A1B2C3D4");
        assert_eq!(record.region_code(), "RG-01");
        assert_eq!(record.status(), RecordStatus::Pending);
        assert_eq!(record.risk_score(), 0);
        assert!(!record.cluster_flag());
        assert!(record.audit_log().is_empty());
    }

    #[test]
    fn test_risk_score_capped_at_100() {
        let record = record().with_risk_score(255);
        assert_eq!(record.risk_score(), 100);
    }

    #[test]
    fn test_raise_and_lower_risk_clamp() {
        let mut record = record().with_risk_score(95);

        record.raise_risk(20);
        assert_eq!(record.risk_score(), 100);

        record.lower_risk(110);
        assert_eq!(record.risk_score(), 0);
    }

    #[test]
    fn test_annotate_is_idempotent_per_rule() {
        let mut record = record();

        record.annotate("budget-allocation", "first note");
        record.annotate("budget-allocation", "second note");
        record.annotate("cross-region-duplicate", "cluster note");

        assert_eq!(record.audit_log().len(), 2);
        assert_eq!(record.audit_log()[0].note, "second note");
        assert_eq!(record.explanation(), "second note; cluster note");
    }

    #[test]
    fn test_tier_rank_ordering() {
        assert!(IncomeTier::Low.rank() < IncomeTier::Medium.rank());
        assert!(IncomeTier::Medium.rank() < IncomeTier::High.rank());
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!(IncomeTier::parse(" low "), Some(IncomeTier::Low));
        assert_eq!(IncomeTier::parse("MEDIUM"), Some(IncomeTier::Medium));
        assert_eq!(IncomeTier::parse("High"), Some(IncomeTier::High));
        assert_eq!(IncomeTier::parse("middle"), None);
    }
}
