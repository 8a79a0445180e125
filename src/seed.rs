//! Deterministic pseudo-randomness keyed off input identity
//!
//! All arithmetic is explicit 32-bit wraparound so the sequence for a given key
//! is identical on every platform and every run. Nothing here reads the clock
//! or any ambient entropy source.

/// 32-bit string hash (`h = h * 31 + unit` over UTF-16 code units)
pub fn hash_seed(key: &str) -> u32 {
    key.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as u32))
}

/// Mulberry32 generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Generator seeded from the hash of `key`
    pub fn from_key(key: &str) -> Self {
        Self::new(hash_seed(key))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// Uniform integer in `[low, high]`; returns `low` when the range is empty
    pub fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        let span = (high - low) as u64 + 1;
        low + ((self.next_f64() * span as f64) as u64).min(span - 1) as u32
    }

    /// `1.0` or `-1.0` with equal probability
    pub fn sign(&mut self) -> f64 {
        if self.next_u32() & 1 == 0 {
            1.0
        } else {
            -1.0
        }
    }
}
