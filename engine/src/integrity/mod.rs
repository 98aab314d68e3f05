//! Ledger integrity - chain bookkeeping and the attack state machine
//!
//! The "hash chain" here is illustrative: tokens are opaque RNG identifiers,
//! not content-derived digests, and linkage order is the only property the
//! engine maintains. An active attack simulation is the sole scenario
//! permitted to violate it; recovery restores linkage in creation order.
//!
//! See `chain.rs` for linkage, `attack.rs` for the state transitions.

pub mod attack;
pub mod chain;

// Re-exports
pub use attack::{
    recover_system, simulate_attack, ThreatReport, ThreatSeverity, INTEGRITY_ATTACK_DROP,
    INTEGRITY_FLOOR, NOMINAL_INTEGRITY,
};
pub use chain::{chain_intact, next_chain_token, verify_chain, GENESIS_TOKEN};
