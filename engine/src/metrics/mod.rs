//! Derived dashboard metrics
//!
//! Pure read-only derivations over the current record collection. No
//! caching and no incremental update: every access recomputes from the
//! batch, so metrics can never drift from the records they describe.

use crate::models::record::{LedgerRecord, RecordStatus};
use serde::Serialize;

/// Risk band for console display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Normal,
    Elevated,
    Critical,
}

/// Band a risk score for display (critical above 80, elevated above 50)
pub fn risk_band(risk_score: u8) -> RiskBand {
    if risk_score > 80 {
        RiskBand::Critical
    } else if risk_score > 50 {
        RiskBand::Elevated
    } else {
        RiskBand::Normal
    }
}

/// Aggregate counts and rates over the current batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardMetrics {
    /// Total records in the batch
    pub total: usize,

    /// Approved records
    pub approved: usize,

    /// Records held for review
    pub pending: usize,

    /// Blocked records (fraud attempts stopped)
    pub blocked: usize,

    /// Average risk score, rounded to the nearest integer (0 when empty)
    pub average_risk: u8,

    /// blocked / total (0.0 when empty)
    pub fraud_rate: f64,
}

impl DashboardMetrics {
    /// Compute metrics over a batch
    pub fn compute(records: &[LedgerRecord]) -> Self {
        let total = records.len();
        let mut approved = 0;
        let mut pending = 0;
        let mut blocked = 0;
        let mut risk_sum: u64 = 0;

        for record in records {
            match record.status() {
                RecordStatus::Approved => approved += 1,
                RecordStatus::Pending => pending += 1,
                RecordStatus::Blocked => blocked += 1,
            }
            risk_sum += u64::from(record.risk_score());
        }

        let average_risk = if total == 0 {
            0
        } else {
            (risk_sum as f64 / total as f64).round() as u8
        };
        let fraud_rate = if total == 0 {
            0.0
        } else {
            blocked as f64 / total as f64
        };

        Self {
            total,
            approved,
            pending,
            blocked,
            average_risk,
            fraud_rate,
        }
    }
}
