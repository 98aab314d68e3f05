//! Batch ingestion
//!
//! Two producers feed the ledger:
//! - **demo**: deterministic synthetic batches for demo mode
//! - **claims**: mapping of externally supplied claim rows (the backend
//!   collaborator's spreadsheet pipeline) onto ledger records
//!
//! Both assign sequential `TXN-%04d` IDs and chain-link tokens in creation
//! order, starting from the genesis token.

pub mod claims;
pub mod demo;

pub use claims::{map_claims, ExternalClaim};
pub use demo::{generate_demo_batch, DemoBatchConfig};

use crate::models::record::RecordStatus;

/// Creation-time status derived from a risk score
///
/// Above 70 the record is auto-blocked; above 50 it is held for review.
pub(crate) fn status_for_risk(risk_score: u8) -> RecordStatus {
    if risk_score > 70 {
        RecordStatus::Blocked
    } else if risk_score > 50 {
        RecordStatus::Pending
    } else {
        RecordStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(status_for_risk(0), RecordStatus::Approved);
        assert_eq!(status_for_risk(50), RecordStatus::Approved);
        assert_eq!(status_for_risk(51), RecordStatus::Pending);
        assert_eq!(status_for_risk(70), RecordStatus::Pending);
        assert_eq!(status_for_risk(71), RecordStatus::Blocked);
        assert_eq!(status_for_risk(100), RecordStatus::Blocked);
    }
}
