//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm for fast, deterministic random number
//! generation. CRITICAL: All randomness in the engine MUST go through this
//! module - demo batches, chain-link tokens, attack/recovery risk jitter and
//! threat selection all draw from one seeded generator.

mod xorshift;

pub use xorshift::DeterministicRng;
