//! Synthetic demo batch generation.
//!
//! Produces the demo-mode dataset deterministically from the session RNG:
//! a block of ordinary claims followed by a handful of duplicate-identity
//! claims filed under a different region, so the cross-region rule always
//! has signal to work with.
//!
//! # Key Principles
//!
//! 1. **Determinism**: same seed + same config → same batch
//! 2. **Creation order**: IDs and chain links are assigned in generation
//!    order; display sorting is a UI concern
//! 3. **Status at creation**: derived from the risk score the way the risk
//!    model would classify it (>70 blocked, >50 pending, else approved)

use crate::ingest::status_for_risk;
use crate::integrity;
use crate::models::record::{IncomeTier, LedgerRecord, RecordStatus};
use crate::rng::DeterministicRng;
use chrono::{DateTime, Duration, Utc};

/// Welfare scheme vocabulary for synthetic claims
pub const SCHEMES: [&str; 8] = [
    "PM-KISAN",
    "MGNREGA",
    "PM-AWAS",
    "Jan Dhan Yojana",
    "Ujjwala Yojana",
    "Ayushman Bharat",
    "PM-SVANidhi",
    "Sukanya Samriddhi",
];

/// Region code vocabulary for synthetic claims
pub const REGIONS: [&str; 8] = [
    "RG-01", "RG-02", "RG-03", "RG-04", "RG-05", "RG-06", "RG-07", "RG-08",
];

/// Risk-model annotations attached to synthetic claims
pub const RISK_NOTES: [&str; 8] = [
    "Frequent claims detected from same household ID",
    "Claim count nearing annual threshold limit",
    "Repeated rejection pattern identified across schemes",
    "Geographic anomaly: claims from multiple districts",
    "Temporal clustering: multiple claims within 24 hours",
    "Duplicate Aadhaar hash linked to different beneficiary records",
    "Benefit amount exceeds scheme-defined maximum",
    "Inactive beneficiary account with sudden activity surge",
];

const DUPLICATE_NOTE: &str = "Duplicate Aadhaar hash linked to different beneficiary records";

/// Rule name under which ingestion annotates records
pub(crate) const RISK_MODEL_RULE: &str = "risk-model";

const TIERS: [IncomeTier; 3] = [IncomeTier::Low, IncomeTier::Medium, IncomeTier::High];

/// Configuration for synthetic demo batches
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DemoBatchConfig {
    /// Number of ordinary records
    pub base_records: usize,

    /// Number of duplicate-identity records appended after the base block
    pub duplicate_records: usize,

    /// Timestamps are drawn from the 30 days before this instant
    pub base_time: DateTime<Utc>,
}

impl DemoBatchConfig {
    /// Standard demo batch: 50 ordinary + 5 duplicate-identity records
    pub fn new(base_time: DateTime<Utc>) -> Self {
        Self {
            base_records: 50,
            duplicate_records: 5,
            base_time,
        }
    }
}

/// Generate a synthetic batch in creation order
///
/// The first `base_records` claims draw scheme, region, tier, amount and
/// risk independently. The trailing `duplicate_records` claims clone the
/// identity of an early record but file from a different region, which is
/// exactly the signal the Cluster Detector looks for.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use welfare_ledger_core_rs::{generate_demo_batch, DemoBatchConfig, DeterministicRng};
///
/// let mut rng = DeterministicRng::new(42);
/// let batch = generate_demo_batch(&DemoBatchConfig::new(Utc::now()), &mut rng);
///
/// assert_eq!(batch.len(), 55);
/// assert_eq!(batch[0].id(), "TXN-0001");
/// ```
pub fn generate_demo_batch(
    config: &DemoBatchConfig,
    rng: &mut DeterministicRng,
) -> Vec<LedgerRecord> {
    let mut records: Vec<LedgerRecord> = Vec::with_capacity(config.base_records + config.duplicate_records);
    let mut previous_hash = integrity::GENESIS_TOKEN.to_string();

    for i in 0..config.base_records {
        let current_hash = integrity::next_chain_token(rng);
        let risk_score = rng.range(0, 100) as u8;
        let timestamp = config.base_time - Duration::milliseconds(rng.range(0, 30 * 86_400_000));

        let record = LedgerRecord::new(
            format!("TXN-{:04}", i + 1),
            format!("CIT-{}", rng.hex_token(8).to_uppercase()),
            rng.pick(&SCHEMES).to_string(),
            rng.pick(&REGIONS).to_string(),
            *rng.pick(&TIERS),
            rng.range(5_000, 50_000),
            timestamp,
            previous_hash.clone(),
            current_hash.clone(),
        )
        .with_risk_score(risk_score)
        .with_initial_status(status_for_risk(risk_score))
        .with_audit_note(RISK_MODEL_RULE, *rng.pick(&RISK_NOTES));

        previous_hash = current_hash;
        records.push(record);
    }

    // Duplicate-identity claims: same citizen as an early record, filed from
    // a different region with elevated risk and a recent timestamp.
    let source_pool = config.base_records.min(30);
    if source_pool > 0 {
        for j in 0..config.duplicate_records {
            let source = &records[rng.range(0, source_pool as i64) as usize];
            let citizen_hash = source.citizen_hash().to_string();
            let scheme = source.scheme().to_string();
            let income_tier = source.income_tier();
            let amount = source.amount();
            let source_region = source.region_code().to_string();

            let other_regions: Vec<&str> = REGIONS
                .iter()
                .copied()
                .filter(|region| *region != source_region)
                .collect();
            let region = *rng.pick(&other_regions);

            let current_hash = integrity::next_chain_token(rng);
            let risk_score = rng.range(70, 100) as u8;
            let timestamp = config.base_time - Duration::milliseconds(rng.range(0, 5 * 86_400_000));

            let record = LedgerRecord::new(
                format!("TXN-{:04}", config.base_records + j + 1),
                citizen_hash,
                scheme,
                region.to_string(),
                income_tier,
                amount,
                timestamp,
                previous_hash.clone(),
                current_hash.clone(),
            )
            .with_risk_score(risk_score)
            .with_initial_status(RecordStatus::Blocked)
            .with_audit_note(RISK_MODEL_RULE, DUPLICATE_NOTE);

            previous_hash = current_hash;
            records.push(record);
        }
    }

    records
}
