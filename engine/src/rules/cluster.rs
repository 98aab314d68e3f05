//! Cross-region duplicate-identity detection.
//!
//! A citizen identity whose claims appear under two or more region codes in
//! the same batch is the system's duplicate-identity fraud signal. Detection
//! is pure and recomputed on every ingest; the derived clusters are never
//! stored on the records themselves, only the per-record `cluster_flag`.

use crate::models::cluster::FraudCluster;
use crate::models::record::{LedgerRecord, RecordStatus};
use std::collections::{BTreeMap, BTreeSet};

/// Rule name under which the detector annotates records
pub const CROSS_REGION_RULE: &str = "cross-region-duplicate";

/// Audit note attached to every record of a flagged citizen
pub const CROSS_REGION_NOTE: &str =
    "Duplicate identity observed across multiple regions; claim held for manual review";

/// Detect fraud clusters in a batch
///
/// Groups records by citizen identity and emits a cluster for every citizen
/// whose claims span more than one distinct (uppercased) region code.
/// `claim_count` is the number of records for that citizen, not the number
/// of regions. Output is ordered by citizen identity, so two runs over the
/// same batch yield identical cluster lists.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use welfare_ledger_core_rs::{detect_clusters, IncomeTier, LedgerRecord};
///
/// let make = |id: &str, citizen: &str, region: &str| {
///     LedgerRecord::new(
///         id.to_string(),
///         citizen.to_string(),
///         "PM-KISAN".to_string(),
///         region.to_string(),
///         IncomeTier::Low,
///         1_000,
///         Utc::now(),
///         "0000000000000000".to_string(),
///         "aaaaaaaaaaaa".to_string(),
///     )
/// };
///
/// let batch = vec![
///     make("TXN-0001", "CIT-X", "RG-01"),
///     make("TXN-0002", "CIT-X", "RG-02"),
///     make("TXN-0003", "CIT-Y", "RG-03"),
/// ];
///
/// let clusters = detect_clusters(&batch);
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].citizen_hash(), "CIT-X");
/// assert_eq!(clusters[0].claim_count(), 2);
/// ```
pub fn detect_clusters(records: &[LedgerRecord]) -> Vec<FraudCluster> {
    let mut groups: BTreeMap<&str, (BTreeSet<String>, usize)> = BTreeMap::new();

    for record in records {
        let entry = groups.entry(record.citizen_hash()).or_default();
        entry.0.insert(record.region_code().to_uppercase());
        entry.1 += 1;
    }

    groups
        .into_iter()
        .filter(|(_, (regions, _))| regions.len() > 1)
        .map(|(citizen, (regions, claim_count))| {
            FraudCluster::new(citizen.to_string(), regions, claim_count)
        })
        .collect()
}

/// Run detection and apply the cross-region rule to the batch
///
/// Every record belonging to a flagged citizen is forced to `Pending`,
/// marked with `cluster_flag = true` and annotated; all other records get
/// `cluster_flag = false` with status untouched. Re-running on an already
/// flagged batch re-derives the same clusters and re-asserts the same
/// state - the audit upsert keeps the trail from growing.
pub fn apply_cross_region_rule(
    records: Vec<LedgerRecord>,
) -> (Vec<LedgerRecord>, Vec<FraudCluster>) {
    let clusters = detect_clusters(&records);
    let flagged: BTreeSet<&str> = clusters.iter().map(|c| c.citizen_hash()).collect();

    let mut updated = records;
    for record in &mut updated {
        if flagged.contains(record.citizen_hash()) {
            record.set_status(RecordStatus::Pending);
            record.set_cluster_flag(true);
            record.annotate(CROSS_REGION_RULE, CROSS_REGION_NOTE);
        } else {
            record.set_cluster_flag(false);
        }
    }

    (updated, clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::IncomeTier;
    use chrono::Utc;

    fn record(id: &str, citizen: &str, region: &str) -> LedgerRecord {
        LedgerRecord::new(
            id.to_string(),
            citizen.to_string(),
            "MGNREGA".to_string(),
            region.to_string(),
            IncomeTier::Medium,
            1_000,
            Utc::now(),
            "0000000000000000".to_string(),
            "bbbbbbbbbbbb".to_string(),
        )
    }

    #[test]
    fn test_single_region_citizen_is_not_a_cluster() {
        let batch = vec![
            record("TXN-0001", "CIT-A", "RG-01"),
            record("TXN-0002", "CIT-A", "RG-01"),
        ];

        assert!(detect_clusters(&batch).is_empty());
    }

    #[test]
    fn test_cluster_regions_and_claim_count() {
        let batch = vec![
            record("TXN-0001", "CIT-A", "RG-01"),
            record("TXN-0002", "CIT-A", "RG-02"),
            record("TXN-0003", "CIT-A", "RG-01"),
        ];

        let clusters = detect_clusters(&batch);
        assert_eq!(clusters.len(), 1);

        let cluster = &clusters[0];
        assert_eq!(cluster.claim_count(), 3);
        assert_eq!(
            cluster.regions().iter().cloned().collect::<Vec<_>>(),
            vec!["RG-01".to_string(), "RG-02".to_string()]
        );
    }

    #[test]
    fn test_detection_is_idempotent() {
        let batch = vec![
            record("TXN-0001", "CIT-A", "RG-01"),
            record("TXN-0002", "CIT-A", "RG-02"),
            record("TXN-0003", "CIT-B", "RG-03"),
        ];

        assert_eq!(detect_clusters(&batch), detect_clusters(&batch));
    }

    #[test]
    fn test_rule_flags_only_cluster_members() {
        let batch = vec![
            record("TXN-0001", "CIT-A", "RG-01"),
            record("TXN-0002", "CIT-A", "RG-02"),
            record("TXN-0003", "CIT-B", "RG-03"),
        ];

        let (updated, clusters) = apply_cross_region_rule(batch);

        assert_eq!(clusters.len(), 1);
        assert!(updated[0].cluster_flag());
        assert!(updated[1].cluster_flag());
        assert!(!updated[2].cluster_flag());
        assert_eq!(updated[0].status(), RecordStatus::Pending);
        assert!(updated[0].explanation().contains(CROSS_REGION_NOTE));
        assert!(updated[2].explanation().is_empty());
    }

    #[test]
    fn test_rule_reapplication_does_not_grow_audit_trail() {
        let batch = vec![
            record("TXN-0001", "CIT-A", "RG-01"),
            record("TXN-0002", "CIT-A", "RG-02"),
        ];

        let (once, _) = apply_cross_region_rule(batch);
        let (twice, _) = apply_cross_region_rule(once.clone());

        assert_eq!(once, twice);
    }
}
