//! Chain-link bookkeeping.
//!
//! Each record carries a previous/current token pair; record n's previous
//! token must equal record n-1's current token in creation order, and the
//! first record links to the designated genesis token. Tokens are unique
//! opaque identifiers drawn from the deterministic RNG - any unique token
//! would do, linkage order is the invariant.

use crate::models::record::LedgerRecord;
use crate::rng::DeterministicRng;

/// Chain-link token of the (virtual) record before the first one
pub const GENESIS_TOKEN: &str = "0000000000000000";

/// Length of generated chain-link tokens (lowercase hex chars)
pub const CHAIN_TOKEN_LEN: usize = 12;

/// Draw the next chain-link token from the session RNG
pub fn next_chain_token(rng: &mut DeterministicRng) -> String {
    rng.hex_token(CHAIN_TOKEN_LEN)
}

/// Indices at which chain linkage is broken
///
/// Index 0 is reported when the first record does not link to the genesis
/// token; index i > 0 when `records[i].previous_hash` differs from
/// `records[i-1].current_hash`. An empty result means the chain is intact.
pub fn verify_chain(records: &[LedgerRecord]) -> Vec<usize> {
    let mut broken = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let expected = if i == 0 {
            GENESIS_TOKEN
        } else {
            records[i - 1].current_hash()
        };
        if record.previous_hash() != expected {
            broken.push(i);
        }
    }

    broken
}

/// True when every link holds in creation order
pub fn chain_intact(records: &[LedgerRecord]) -> bool {
    verify_chain(records).is_empty()
}

/// Restore linkage across the whole batch in creation order
///
/// Used by recovery after an attack simulation corrupted links.
pub(crate) fn relink_chain(records: &mut [LedgerRecord]) {
    let mut previous = GENESIS_TOKEN.to_string();

    for record in records.iter_mut() {
        record.set_previous_hash(previous);
        previous = record.current_hash().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::IncomeTier;
    use chrono::Utc;

    fn chained(n: usize) -> Vec<LedgerRecord> {
        let mut rng = DeterministicRng::new(11);
        let mut previous = GENESIS_TOKEN.to_string();
        let mut records = Vec::new();

        for i in 0..n {
            let current = next_chain_token(&mut rng);
            records.push(LedgerRecord::new(
                format!("TXN-{:04}", i + 1),
                format!("CIT-{i}"),
                "PM-KISAN".to_string(),
                "RG-01".to_string(),
                IncomeTier::Low,
                1_000,
                Utc::now(),
                previous.clone(),
                current.clone(),
            ));
            previous = current;
        }

        records
    }

    #[test]
    fn test_fresh_chain_is_intact() {
        assert!(chain_intact(&chained(10)));
        assert!(chain_intact(&chained(0)));
        assert!(chain_intact(&chained(1)));
    }

    #[test]
    fn test_broken_link_is_located() {
        let mut records = chained(5);
        records[3].set_previous_hash("feedfacef00d".to_string());

        assert_eq!(verify_chain(&records), vec![3]);
    }

    #[test]
    fn test_genesis_violation_is_index_zero() {
        let mut records = chained(3);
        records[0].set_previous_hash("feedfacef00d".to_string());

        assert_eq!(verify_chain(&records), vec![0]);
    }

    #[test]
    fn test_relink_repairs_chain() {
        let mut records = chained(6);
        records[2].set_previous_hash("badbadbadbad".to_string());
        records[5].set_previous_hash("badbadbadbad".to_string());
        assert!(!chain_intact(&records));

        relink_chain(&mut records);
        assert!(chain_intact(&records));
    }
}
