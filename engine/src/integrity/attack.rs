//! Attack and recovery transitions.
//!
//! The attack simulation represents tampering: it freezes the system,
//! degrades the ledger-integrity signal, inflates every record's risk score
//! and corrupts the tail of the chain. Recovery represents verified
//! restoration: integrity returns to nominal, risk scores relax and the
//! chain is re-linked in creation order.
//!
//! Integrity is a coarse health percentage. Attack and recovery are the
//! only operations permitted to move it away from nominal.

use crate::integrity::chain::{next_chain_token, relink_chain, GENESIS_TOKEN};
use crate::models::record::LedgerRecord;
use crate::models::state::{SystemState, SystemStatus};
use crate::rng::DeterministicRng;
use serde::{Deserialize, Serialize};

/// Nominal ledger integrity percentage
pub const NOMINAL_INTEGRITY: f64 = SystemState::NOMINAL_INTEGRITY;

/// Integrity percentage lost per attack
pub const INTEGRITY_ATTACK_DROP: f64 = 23.4;

/// Integrity never drops below this floor
pub const INTEGRITY_FLOOR: f64 = 45.0;

/// Attack raises each risk score by a value in [0, this)
const ATTACK_RISK_JITTER: i64 = 25;

/// Recovery lowers each risk score by a value in [0, this)
const RECOVERY_RISK_JITTER: i64 = 20;

/// Number of tail chain links the attack corrupts
const CORRUPTED_TAIL_LINKS: usize = 3;

const THREATS: [&str; 5] = [
    "Duplicate beneficiary injection attempt",
    "Mass claim bot attack detected",
    "Ledger tampering attempt",
    "Fake Aadhaar batch upload",
    "High-value scheme exploit detected",
];

const RECOMMENDED_ACTION: &str = "Trigger audit and freeze suspicious accounts";

/// Threat severity bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatSeverity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ThreatSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatSeverity::Low => write!(f, "LOW"),
            ThreatSeverity::Medium => write!(f, "MEDIUM"),
            ThreatSeverity::High => write!(f, "HIGH"),
        }
    }
}

/// Description of a simulated attack, for the threat console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatReport {
    pub threat: String,
    pub severity: ThreatSeverity,
    pub recommended_action: String,
}

/// Fire the attack simulation
///
/// Settable from any state: sets the attack flag, freezes the system,
/// drops integrity by [`INTEGRITY_ATTACK_DROP`] (floored at
/// [`INTEGRITY_FLOOR`]), raises every risk score by a random amount in
/// [0, 25) clamped to 100, and corrupts the last few chain links - the one
/// permitted linkage violation.
pub fn simulate_attack(
    records: &mut [LedgerRecord],
    system: &mut SystemState,
    rng: &mut DeterministicRng,
) -> ThreatReport {
    system.set_under_attack(true);
    system.set_status(SystemStatus::Frozen);
    system.set_integrity((system.ledger_integrity() - INTEGRITY_ATTACK_DROP).max(INTEGRITY_FLOOR));

    for record in records.iter_mut() {
        record.raise_risk(rng.range(0, ATTACK_RISK_JITTER) as u8);
    }

    corrupt_tail_links(records, rng);

    let severities = [
        ThreatSeverity::Low,
        ThreatSeverity::Medium,
        ThreatSeverity::High,
    ];
    ThreatReport {
        threat: rng.pick(&THREATS).to_string(),
        severity: *rng.pick(&severities),
        recommended_action: RECOMMENDED_ACTION.to_string(),
    }
}

/// Recover from the attack simulation
///
/// Clears the attack flag, reactivates the system, resets integrity to
/// exactly [`NOMINAL_INTEGRITY`], lowers every risk score by a random
/// amount in [0, 20) floored at 0, and re-links the chain in creation
/// order (verified restoration).
pub fn recover_system(
    records: &mut [LedgerRecord],
    system: &mut SystemState,
    rng: &mut DeterministicRng,
) {
    system.set_under_attack(false);
    system.set_status(SystemStatus::Active);
    system.set_integrity(NOMINAL_INTEGRITY);

    for record in records.iter_mut() {
        record.lower_risk(rng.range(0, RECOVERY_RISK_JITTER) as u8);
    }

    relink_chain(records);
}

/// Overwrite the previous-hash of the tail records with tokens that are
/// guaranteed not to match the true link.
fn corrupt_tail_links(records: &mut [LedgerRecord], rng: &mut DeterministicRng) {
    let len = records.len();
    let start = len.saturating_sub(CORRUPTED_TAIL_LINKS);

    for i in start..len {
        let expected = if i == 0 {
            GENESIS_TOKEN.to_string()
        } else {
            records[i - 1].current_hash().to_string()
        };

        let mut forged = next_chain_token(rng);
        while forged == expected {
            forged = next_chain_token(rng);
        }
        records[i].set_previous_hash(forged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::chain::chain_intact;
    use crate::models::record::IncomeTier;
    use chrono::Utc;

    fn chained(n: usize, rng: &mut DeterministicRng) -> Vec<LedgerRecord> {
        let mut previous = GENESIS_TOKEN.to_string();
        let mut records = Vec::new();

        for i in 0..n {
            let current = next_chain_token(rng);
            records.push(
                LedgerRecord::new(
                    format!("TXN-{:04}", i + 1),
                    format!("CIT-{i}"),
                    "PM-KISAN".to_string(),
                    "RG-01".to_string(),
                    IncomeTier::Low,
                    1_000,
                    Utc::now(),
                    previous.clone(),
                    current.clone(),
                )
                .with_risk_score(50),
            );
            previous = current;
        }

        records
    }

    #[test]
    fn test_attack_freezes_and_degrades() {
        let mut rng = DeterministicRng::new(21);
        let mut records = chained(10, &mut rng);
        let mut system = SystemState::default();

        let report = simulate_attack(&mut records, &mut system, &mut rng);

        assert!(system.under_attack());
        assert_eq!(system.status(), SystemStatus::Frozen);
        assert!((system.ledger_integrity() - 76.3).abs() < 1e-9);
        assert!(!chain_intact(&records));
        assert!(THREATS.contains(&report.threat.as_str()));
        assert!(records.iter().all(|r| r.risk_score() <= 100));
    }

    #[test]
    fn test_integrity_floor_holds_under_repeated_attacks() {
        let mut rng = DeterministicRng::new(21);
        let mut records = chained(3, &mut rng);
        let mut system = SystemState::default();

        for _ in 0..5 {
            simulate_attack(&mut records, &mut system, &mut rng);
        }

        assert_eq!(system.ledger_integrity(), INTEGRITY_FLOOR);
    }

    #[test]
    fn test_recovery_restores_nominal_state_and_chain() {
        let mut rng = DeterministicRng::new(21);
        let mut records = chained(10, &mut rng);
        let mut system = SystemState::default();

        simulate_attack(&mut records, &mut system, &mut rng);
        recover_system(&mut records, &mut system, &mut rng);

        assert!(!system.under_attack());
        assert_eq!(system.status(), SystemStatus::Active);
        assert_eq!(system.ledger_integrity(), NOMINAL_INTEGRITY);
        assert!(chain_intact(&records));
    }

    #[test]
    fn test_attack_on_empty_batch_only_moves_system_state() {
        let mut rng = DeterministicRng::new(3);
        let mut records: Vec<LedgerRecord> = Vec::new();
        let mut system = SystemState::default();

        simulate_attack(&mut records, &mut system, &mut rng);

        assert!(system.under_attack());
        assert_eq!(system.status(), SystemStatus::Frozen);
    }
}
