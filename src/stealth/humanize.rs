//! Human behavior simulation for anti-detection
//!
//! Every random draw the engine makes goes through [`Humanizer`], so a seeded
//! instance makes a whole session reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How an intentional miss shifts the reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissTiming {
    /// Reel before the fish is really on
    Early,
    /// Reel after the fish has let go
    Late,
}

/// Outcome of the miss sub-policy for one bite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissDecision {
    /// Signed offset added to the catch delay (ms)
    pub offset_ms: i64,
}

impl MissDecision {
    pub fn timing(&self) -> MissTiming {
        if self.offset_ms < 0 {
            MissTiming::Early
        } else {
            MissTiming::Late
        }
    }

    /// Apply the offset to a base delay, floored at zero
    pub fn apply(&self, base_delay_ms: u64) -> u64 {
        apply_offset(base_delay_ms, self.offset_ms)
    }
}

/// `max(0, base + offset)`
pub fn apply_offset(base_delay_ms: u64, offset_ms: i64) -> u64 {
    i64::try_from(base_delay_ms)
        .unwrap_or(i64::MAX)
        .saturating_add(offset_ms)
        .max(0) as u64
}

/// Humanizer for generating realistic timing
pub struct Humanizer {
    rng: StdRng,
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Humanizer {
    /// Create a new humanizer seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible humanizer
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform delay in `[min, max]`; returns `min` when the range is empty
    pub fn delay_between(&mut self, min_ms: u64, max_ms: u64) -> u64 {
        if max_ms <= min_ms {
            return min_ms;
        }
        self.rng.gen_range(min_ms..=max_ms)
    }

    /// Uniform signed offset in `[min, max]`
    pub fn offset_between(&mut self, min_ms: i64, max_ms: i64) -> i64 {
        if max_ms <= min_ms {
            return min_ms;
        }
        self.rng.gen_range(min_ms..=max_ms)
    }

    /// Uniform float in `[min, max)`
    pub fn float_between(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Bernoulli draw with `percent` chance out of 100
    pub fn chance(&mut self, percent: u32) -> bool {
        self.rng.gen_range(0..100) < percent
    }

    /// Decide whether to miss this bite and by how much
    pub fn decide_miss(&mut self, chance_percent: u32, min_offset_ms: i64, max_offset_ms: i64) -> Option<MissDecision> {
        if !self.chance(chance_percent) {
            return None;
        }
        Some(MissDecision {
            offset_ms: self.offset_between(min_offset_ms, max_offset_ms),
        })
    }

    /// Random direction as a unit vector
    pub fn direction(&mut self) -> (f32, f32) {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        (angle.cos(), angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_in_range() {
        let mut humanizer = Humanizer::seeded(7);

        for _ in 0..500 {
            let delay = humanizer.delay_between(80, 500);
            assert!((80..=500).contains(&delay));
        }
    }

    #[test]
    fn test_empty_range_returns_min() {
        let mut humanizer = Humanizer::seeded(1);
        assert_eq!(humanizer.delay_between(300, 300), 300);
        assert_eq!(humanizer.delay_between(300, 100), 300);
        assert_eq!(humanizer.offset_between(5, -5), 5);
    }

    #[test]
    fn test_chance_bounds() {
        let mut humanizer = Humanizer::seeded(3);
        for _ in 0..200 {
            assert!(!humanizer.chance(0));
            assert!(humanizer.chance(100));
        }
    }

    #[test]
    fn test_miss_sign_convention() {
        let mut humanizer = Humanizer::seeded(11);
        let mut early = 0;
        let mut late = 0;

        for _ in 0..1000 {
            let miss = humanizer.decide_miss(100, -500, 800).unwrap();
            assert!((-500..=800).contains(&miss.offset_ms));
            match miss.timing() {
                MissTiming::Early => {
                    assert!(miss.offset_ms < 0);
                    early += 1;
                }
                MissTiming::Late => {
                    assert!(miss.offset_ms >= 0);
                    late += 1;
                }
            }
            let delay = miss.apply(100);
            assert!(delay <= 900);
            assert_eq!(delay, (100 + miss.offset_ms).max(0) as u64);
        }

        assert!(early > 0 && late > 0);
    }

    #[test]
    fn test_apply_offset_floors_at_zero() {
        assert_eq!(apply_offset(100, -500), 0);
        assert_eq!(apply_offset(100, 800), 900);
        assert_eq!(apply_offset(100, 0), 100);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = Humanizer::seeded(42);
        let mut b = Humanizer::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.delay_between(0, 10_000), b.delay_between(0, 10_000));
        }
    }
}
