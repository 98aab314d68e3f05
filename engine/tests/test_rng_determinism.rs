//! Determinism guarantees: same seed, same session.

use chrono::{DateTime, Utc};
use welfare_ledger_core_rs::{
    DemoBatchConfig, DeterministicRng, SessionConfig, SessionCoordinator, SessionMode,
};

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-02-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn demo_session(seed: u64) -> SessionCoordinator {
    let config = SessionConfig::new(seed).with_demo(DemoBatchConfig::new(base_time()));
    let mut session = SessionCoordinator::new(config);
    session.set_mode(SessionMode::Demo);
    session
}

#[test]
fn test_rng_sequence_is_deterministic() {
    let mut a = DeterministicRng::new(12345);
    let mut b = DeterministicRng::new(12345);

    for _ in 0..1000 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn test_hex_tokens_are_deterministic() {
    let mut a = DeterministicRng::new(777);
    let mut b = DeterministicRng::new(777);

    for _ in 0..50 {
        assert_eq!(a.hex_token(12), b.hex_token(12));
    }
}

#[test]
fn test_sessions_with_same_seed_agree_on_everything() {
    let a = demo_session(42);
    let b = demo_session(42);

    assert_eq!(a.records(), b.records());
    assert_eq!(a.clusters(), b.clusters());
    assert_eq!(a.metrics(), b.metrics());
}

#[test]
fn test_sessions_with_different_seeds_diverge() {
    let a = demo_session(42);
    let b = demo_session(43);

    assert_ne!(a.records(), b.records());
}

#[test]
fn test_attack_jitter_is_deterministic_per_seed() {
    let mut a = demo_session(9);
    let mut b = demo_session(9);

    let report_a = a.simulate_attack();
    let report_b = b.simulate_attack();

    assert_eq!(report_a, report_b);
    assert_eq!(a.records(), b.records());
}
