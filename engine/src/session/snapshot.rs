//! Session snapshot - the persisted surface
//!
//! A flat keyed record of the session flags and system values. Business
//! records are explicitly excluded: the demo batch is regenerated from the
//! seed on restore, live batches are re-fetched from the backend
//! collaborator.
//!
//! The checksum guards against storage-level corruption of the snapshot
//! itself; it is computed over the canonical JSON of the snapshot with the
//! checksum field emptied.

use crate::models::state::SystemStatus;
use crate::session::engine::SessionMode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from snapshot capture or restore
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("snapshot checksum mismatch")]
    ChecksumMismatch,
}

/// Flat persisted session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Whether the external login collaborator authenticated an officer
    pub authenticated: bool,

    /// Selected data source mode
    pub mode: Option<SessionMode>,

    /// Operating status at capture time
    pub system_status: SystemStatus,

    /// Ledger integrity at capture time
    pub ledger_integrity: f64,

    /// Attack flag at capture time
    pub under_attack: bool,

    /// Whether a batch was installed (drives regeneration on restore)
    pub dataset_loaded: bool,

    /// Leftover budget of the most recent allocation
    pub remaining_budget: i64,

    /// Session RNG seed (regenerates the demo batch exactly)
    pub rng_seed: u64,

    /// SHA-256 over the canonical JSON with this field emptied
    pub checksum: String,
}

impl SessionSnapshot {
    /// Compute the checksum for this snapshot's content
    pub fn compute_checksum(&self) -> Result<String, SnapshotError> {
        let mut unsigned = self.clone();
        unsigned.checksum = String::new();

        let canonical = serde_json::to_string(&unsigned)?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Verify the stored checksum against the content
    pub fn verify(&self) -> Result<(), SnapshotError> {
        if self.compute_checksum()? != self.checksum {
            return Err(SnapshotError::ChecksumMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        let mut snapshot = SessionSnapshot {
            authenticated: true,
            mode: Some(SessionMode::Demo),
            system_status: SystemStatus::Paused,
            ledger_integrity: 99.7,
            under_attack: false,
            dataset_loaded: true,
            remaining_budget: 12_000,
            rng_seed: 42,
            checksum: String::new(),
        };
        snapshot.checksum = snapshot.compute_checksum().unwrap();
        snapshot
    }

    #[test]
    fn test_checksum_verifies() {
        assert!(snapshot().verify().is_ok());
    }

    #[test]
    fn test_tampered_snapshot_fails_verification() {
        let mut tampered = snapshot();
        tampered.remaining_budget = 999_999;

        assert!(matches!(
            tampered.verify(),
            Err(SnapshotError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_checksum() {
        let original = snapshot();
        let encoded = serde_json::to_string(&original).unwrap();
        let decoded: SessionSnapshot = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, original);
        assert!(decoded.verify().is_ok());
    }
}
