//! Seeded random number generation for combat rolls and deck shuffles.
//!
//! # Determinism
//!
//! The generator is a 32-bit linear congruential generator whose entire
//! trajectory is fixed by its seed. Two instances created with the same seed
//! produce identical infinite sequences, and [`CombatRng::state`] /
//! [`CombatRng::set_state`] allow a sequence to be captured mid-stream and
//! resumed elsewhere. Match replay and verification depend on both properties.

/// Serializable capture of a generator's position in its sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RngState {
    pub seed: u64,
    pub state: u64,
}

/// Linear congruential generator (Numerical Recipes parameters).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatRng {
    seed: u64,
    state: u64,
}

impl CombatRng {
    /// LCG multiplier.
    const MULTIPLIER: u64 = 1_664_525;

    /// LCG increment.
    const INCREMENT: u64 = 1_013_904_223;

    /// LCG modulus (2^32).
    const MODULUS: u64 = 1 << 32;

    /// Creates a generator positioned at the start of `seed`'s sequence.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            state: seed % Self::MODULUS,
        }
    }

    /// Returns the seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advances the generator and returns a float in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.state = (Self::MULTIPLIER * self.state + Self::INCREMENT) % Self::MODULUS;
        self.state as f64 / Self::MODULUS as f64
    }

    /// Returns an integer in `[min, max]` inclusive.
    ///
    /// Returns `min` without advancing when the range is empty.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        (self.next() * span).floor() as i64 + min
    }

    /// Returns a float in `[min, max)`.
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }

    /// Returns true with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next() < probability
    }

    /// Returns a Fisher-Yates shuffled copy of `items`.
    ///
    /// The input is left untouched; the output holds the same multiset.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut result = items.to_vec();
        for i in (1..result.len()).rev() {
            let j = self.next_int(0, i as i64) as usize;
            result.swap(i, j);
        }
        result
    }

    /// Captures the current position in the sequence.
    pub fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            state: self.state,
        }
    }

    /// Restores a previously captured position.
    pub fn set_state(&mut self, state: RngState) {
        self.seed = state.seed;
        self.state = state.state % Self::MODULUS;
    }

    /// Builds a generator directly from a captured position.
    pub fn from_state(state: RngState) -> Self {
        let mut rng = Self::new(state.seed);
        rng.set_state(state);
        rng
    }
}
