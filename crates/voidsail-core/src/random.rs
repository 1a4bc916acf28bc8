//! Deterministic random source for all procedural generation.
//!
//! Every value drawn during galaxy and planet generation comes from a
//! `SeededRandom`, so a world is a pure function of its seed, its configs and
//! the order of calls. Independent streams of the same seed let a planet
//! regenerate identically no matter when it is first approached.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::{COSMETIC_STREAM, GALAXY_STREAM};
use crate::types::PlanetId;

#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    stream: u64,
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Generator for galaxy layout.
    pub fn new(seed: u64) -> Self {
        Self::for_stream(seed, GALAXY_STREAM)
    }

    /// Generator for an independent stream of the same world seed.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { seed, stream, rng }
    }

    /// Generator used to expand one planet's terrain, decoration and population.
    pub fn for_planet(seed: u64, planet: PlanetId) -> Self {
        Self::for_stream(seed, 1 + planet.0 as u64)
    }

    /// Generator for choices that must not affect collision topology.
    pub fn cosmetic(seed: u64) -> Self {
        Self::for_stream(seed, COSMETIC_STREAM)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stream(&self) -> u64 {
        self.stream
    }

    /// Restart this stream from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::for_stream(seed, self.stream);
    }

    /// Uniform in `[min, max)`. Returns `min` for an empty range.
    pub fn float_in(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Uniform in `[0, max)`.
    pub fn up_to(&mut self, max: f32) -> f32 {
        self.float_in(0.0, max)
    }

    /// Uniform in `[-max, max)`.
    pub fn symmetric(&mut self, max: f32) -> f32 {
        self.float_in(-max, max)
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f32 {
        self.up_to(TAU)
    }

    /// True with the given probability.
    pub fn test(&mut self, probability: f32) -> bool {
        self.rng.gen::<f32>() < probability
    }

    /// `1.0` or `-1.0` with equal chance.
    pub fn sign(&mut self) -> f32 {
        if self.test(0.5) {
            1.0
        } else {
            -1.0
        }
    }

    /// Uniform in `[0, max)`. Returns 0 when `max` is 0.
    pub fn int_below(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        self.rng.gen_range(0..max)
    }

    /// Integer in `[fraction * max, max)`, truncated.
    pub fn int_from_fraction(&mut self, fraction: f32, max: usize) -> usize {
        let max_f = max as f32;
        self.float_in(fraction * max_f, max_f) as usize
    }

    /// Uniformly chosen element, `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.int_below(items.len());
        items.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        for _ in 0..100 {
            assert_eq!(a.float_in(0.0, 10.0).to_bits(), b.float_in(0.0, 10.0).to_bits());
        }
    }

    #[test]
    fn test_streams_are_independent() {
        let mut galaxy = SeededRandom::new(7);
        let mut planet = SeededRandom::for_planet(7, PlanetId(0));
        let a: Vec<u32> = (0..8).map(|_| galaxy.float_in(0.0, 1.0).to_bits()).collect();
        let b: Vec<u32> = (0..8).map(|_| planet.float_in(0.0, 1.0).to_bits()).collect();
        assert_ne!(a, b, "Planet stream should not replay the galaxy stream");
    }

    #[test]
    fn test_ranges() {
        let mut rng = SeededRandom::new(1);
        for _ in 0..1000 {
            let v = rng.float_in(2.0, 3.0);
            assert!((2.0..3.0).contains(&v));
            let s = rng.symmetric(1.0);
            assert!((-1.0..1.0).contains(&s));
            let i = rng.int_from_fraction(0.7, 10);
            assert!((7..10).contains(&i), "int_from_fraction out of range: {i}");
        }
        assert_eq!(rng.float_in(5.0, 5.0), 5.0);
        assert_eq!(rng.int_below(0), 0);
        assert!(rng.pick::<u8>(&[]).is_none());
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut rng = SeededRandom::for_planet(9, PlanetId(3));
        let first = rng.angle();
        rng.angle();
        rng.reseed(9);
        assert_eq!(rng.angle().to_bits(), first.to_bits());
        assert_eq!(rng.stream(), 4);
    }
}
