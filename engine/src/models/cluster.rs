//! Fraud cluster - derived entity
//!
//! A cluster is a citizen identity whose claim records appear under more
//! than one region code within the same batch. Clusters are ephemeral:
//! recomputed on every ingest, never stored with the records themselves.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A citizen identity observed under >= 2 distinct region codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudCluster {
    citizen_hash: String,
    regions: BTreeSet<String>,
    claim_count: usize,
}

impl FraudCluster {
    /// Build a cluster; the detector guarantees `regions.len() >= 2`
    pub(crate) fn new(citizen_hash: String, regions: BTreeSet<String>, claim_count: usize) -> Self {
        debug_assert!(regions.len() >= 2, "a cluster spans at least two regions");
        Self {
            citizen_hash,
            regions,
            claim_count,
        }
    }

    /// Citizen identity token
    pub fn citizen_hash(&self) -> &str {
        &self.citizen_hash
    }

    /// Distinct region codes observed (size >= 2)
    pub fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    /// Number of records for this citizen in the batch (not region count)
    pub fn claim_count(&self) -> usize {
        self.claim_count
    }
}
