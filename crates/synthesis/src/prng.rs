//! Seeded mulberry32 generator.
//!
//! Used where a run of related values (a post feed, per-point jitter of a
//! series) must look random yet stay identical across re-renders. Two
//! generators built from the same seed always draw the same sequence.

use crate::hashing::hash_key;
use rand::RngCore;

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u32,
    state: u32,
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Generator seeded from the hash of a composite key.
    pub fn from_key(key: &str) -> Self {
        Self::new(hash_key(key))
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Rewind to the first draw.
    pub fn reset(&mut self) {
        self.state = self.seed;
    }

    /// Next raw 32-bit output.
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }

    /// Next uniform float in [0, 1).
    pub fn next_float(&mut self) -> f64 {
        f64::from(self.next_raw()) / TWO_POW_32
    }

    /// Next uniform float in [min, max).
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_float() * (max - min)
    }
}

impl Iterator for SeededRandom {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_float())
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_raw());
        let high = u64::from(self.next_raw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
