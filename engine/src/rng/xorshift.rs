//! xorshift64* random number generator
//!
//! Fast, high-quality PRNG suitable for deterministic simulation.
//!
//! # Determinism
//!
//! Same seed → same sequence. This is CRITICAL for:
//! - Reproducing a demo dataset after a session restore
//! - Testing (verify behavior against a known seed)
//! - Auditing (replay an attack simulation exactly)

use serde::{Deserialize, Serialize};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use welfare_ledger_core_rs::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// let amount = rng.range(5_000, 50_000); // [5000, 50000)
/// let token = rng.hex_token(12);
/// assert_eq!(token.len(), 12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeterministicRng {
    /// Internal state (64-bit)
    state: u64,
}

impl DeterministicRng {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift requirement).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next_u64();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Pick a random element from a non-empty slice
    ///
    /// # Panics
    /// Panics if the slice is empty
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "cannot pick from an empty slice");

        let index = (self.next_u64() % items.len() as u64) as usize;
        &items[index]
    }

    /// Generate a lowercase hex token of the given length
    ///
    /// Used for chain-link tokens and synthetic citizen identities. Tokens
    /// are opaque identifiers, not digests of any content.
    pub fn hex_token(&mut self, len: usize) -> String {
        let mut out = String::with_capacity(len);
        while out.len() < len {
            let mut value = self.next_u64();
            for _ in 0..16 {
                if out.len() == len {
                    break;
                }
                out.push(HEX_DIGITS[(value & 0xf) as usize] as char);
                value >>= 4;
            }
        }
        out
    }

    /// Get current RNG state (for snapshot bookkeeping)
    pub fn get_state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = DeterministicRng::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = DeterministicRng::new(99999);
        let mut b = DeterministicRng::new(99999);

        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = DeterministicRng::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_range_stays_in_bounds() {
        let mut rng = DeterministicRng::new(12345);

        for _ in 0..1000 {
            let value = rng.range(5_000, 50_000);
            assert!((5_000..50_000).contains(&value));
        }
    }

    #[test]
    fn test_hex_token_length_and_charset() {
        let mut rng = DeterministicRng::new(7);

        for len in [1, 8, 12, 16, 33] {
            let token = rng.hex_token(len);
            assert_eq!(token.len(), len);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_pick_covers_slice() {
        let mut rng = DeterministicRng::new(42);
        let items = ["a", "b", "c"];

        for _ in 0..100 {
            let picked = rng.pick(&items);
            assert!(items.contains(picked));
        }
    }
}
