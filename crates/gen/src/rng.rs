//! Deterministic random stream threaded through every generator.
//!
//! The stream is positional: generation code must consume it in a fixed,
//! documented order, because reordering a single draw changes every
//! subsequent decision. The mixing function is frozen; identical seeds must
//! keep producing identical streams across releases so regression grids stay
//! byte-stable.

use rand::RngCore;

/// Fixed additive increment applied before mixing (Weyl sequence step).
const INCREMENT: u32 = 0x6D2B_79F5;

/// Odd multiplier for deriving child seeds in [`StructureRng::fork`].
const FORK_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seeded 32-bit generator: additive state advance followed by two rounds of
/// multiply-xorshift, normalized to `[0, 1)` by dividing by 2^32.
#[derive(Debug, Clone)]
pub struct StructureRng {
    state: u32,
    seed: u64,
}

impl StructureRng {
    /// Fold a 64-bit seed into the 32-bit state.
    pub fn new(seed: u64) -> Self {
        Self {
            state: (seed ^ (seed >> 32)) as u32,
            seed,
        }
    }

    /// Raw mixed output, one advance per call.
    #[inline]
    pub fn next_u32_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut z = self.state;
        z = (z ^ (z >> 15)).wrapping_mul(z | 1);
        z ^= z.wrapping_add((z ^ (z >> 7)).wrapping_mul(z | 61));
        z ^ (z >> 14)
    }

    /// Next value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32_raw()) / 4_294_967_296.0
    }

    /// Uniform index into a collection of `len` items.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_f64() * len as f64) as usize
    }

    /// Uniform inclusive integer range.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo <= hi);
        let span = (hi - lo) as i64 + 1;
        lo + (self.next_f64() * span as f64) as i32
    }

    /// True with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform pick from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.index(items.len())]
    }

    /// Weighted pick. Weights need not sum to one.
    pub fn pick_weighted<'a, T>(&mut self, items: &'a [(T, f64)]) -> &'a T {
        debug_assert!(!items.is_empty());
        let total: f64 = items.iter().map(|(_, weight)| weight).sum();
        let mut roll = self.next_f64() * total;
        for (item, weight) in items {
            roll -= weight;
            if roll < 0.0 {
                return item;
            }
        }
        &items[items.len() - 1].0
    }

    /// Child generator for compound-site slot `slot`.
    ///
    /// The child seed depends only on the parent seed and the slot index, so
    /// sub-structures can be generated in any schedule (or in parallel) and
    /// still reproduce, provided results are pasted back in fixed slot order.
    pub fn fork(&self, slot: u32) -> StructureRng {
        let child = self
            .seed
            .wrapping_add(u64::from(slot).wrapping_add(1).wrapping_mul(FORK_MULTIPLIER));
        StructureRng::new(child)
    }
}

impl RngCore for StructureRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u32_raw()
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32_raw()) << 32) | u64::from(self.next_u32_raw())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_seeds_give_identical_streams() {
        let mut a = StructureRng::new(42);
        let mut b = StructureRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u32_raw(), b.next_u32_raw());
        }
    }

    #[test]
    fn stream_regression_values() {
        // Frozen outputs for seed 1. If these move, every stored grid built
        // from this generator changes with them.
        let mut rng = StructureRng::new(1);
        let first: Vec<u32> = (0..4).map(|_| rng.next_u32_raw()).collect();
        assert_eq!(first, vec![2693262067, 11749833, 2265367787, 4213581821]);
    }

    #[test]
    fn next_f64_is_half_open_unit() {
        let mut rng = StructureRng::new(7);
        for _ in 0..10_000 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn index_stays_in_range() {
        let mut rng = StructureRng::new(99);
        for _ in 0..10_000 {
            assert!(rng.index(7) < 7);
        }
        for _ in 0..10_000 {
            let roll = rng.range_i32(-3, 3);
            assert!((-3..=3).contains(&roll));
        }
    }

    #[test]
    fn seed_fold_spreads_high_bits() {
        let mut low = StructureRng::new(5);
        let mut high = StructureRng::new(5 | (1 << 40));
        assert_ne!(low.next_u32_raw(), high.next_u32_raw());
    }

    #[test]
    fn forks_are_deterministic_and_distinct() {
        let parent = StructureRng::new(1234);
        let mut child_a = parent.fork(0);
        let mut child_a_again = parent.fork(0);
        let mut child_b = parent.fork(1);
        let first_a = child_a.next_u32_raw();
        assert_eq!(first_a, child_a_again.next_u32_raw());
        assert_ne!(first_a, child_b.next_u32_raw());
    }

    #[test]
    fn fork_is_independent_of_parent_position() {
        let mut parent = StructureRng::new(77);
        let before = parent.fork(3).next_u32_raw();
        parent.next_f64();
        parent.next_f64();
        let after = parent.fork(3).next_u32_raw();
        assert_eq!(before, after);
    }

    #[test]
    fn pick_weighted_respects_zero_weight() {
        let mut rng = StructureRng::new(11);
        let items = [("never", 0.0), ("always", 1.0)];
        for _ in 0..100 {
            assert_eq!(*rng.pick_weighted(&items), "always");
        }
    }
}
