//! Xoro128: 128-bit xoroshiro+
//!
//! Rotation/shift constants (55, 14, 36). The output `s0 + s1` is read before
//! the words are mutated.

use super::{expect_algorithm, Algorithm, BitSource, EngineError, RandomEngine};
use crate::jump::{self, LinearState};
use crate::seed::{entropy_seed, expand_nonzero, Seed, SeedError};
use crate::snapshot::EngineSnapshot;
use tracing::trace;

const JUMP_2_64: [u64; 2] = [0xBEAC_0467_EBA5_FACB, 0xD86B_048B_86AA_9922];

const SKIP_MAGNITUDE: i32 = 64;

/// 128-bit xoroshiro+ generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xoro128 {
    s0: u64,
    s1: u64,
}

impl Xoro128 {
    /// Create a generator from seed material
    pub fn new(seed: Seed<'_>) -> Result<Self, SeedError> {
        let [s0, s1] = expand_nonzero(Algorithm::Xoro128, seed, [0; 2])?;
        Ok(Self { s0, s1 })
    }

    /// Create a generator from raw state words
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidState`] if both words are zero
    pub fn from_state(state: [u64; 2]) -> Result<Self, EngineError> {
        if state == [0, 0] {
            return Err(EngineError::InvalidState {
                algorithm: Algorithm::Xoro128,
                reason: "state must not be all zero".to_string(),
            });
        }
        Ok(Self {
            s0: state[0],
            s1: state[1],
        })
    }

    pub fn from_entropy() -> Result<Self, SeedError> {
        Self::new(Seed::Int(entropy_seed()))
    }

    pub fn state(&self) -> [u64; 2] {
        [self.s0, self.s1]
    }

    #[inline]
    fn advance(&mut self) {
        let s0 = self.s0;
        let y = self.s1 ^ s0;
        self.s0 = s0.rotate_left(55) ^ y ^ (y << 14);
        self.s1 = y.rotate_left(36);
    }
}

impl LinearState<2> for Xoro128 {
    fn words(&self) -> [u64; 2] {
        self.state()
    }

    fn replace_words(&mut self, words: [u64; 2]) {
        [self.s0, self.s1] = words;
    }

    fn step(&mut self) {
        self.advance();
    }
}

impl BitSource for Xoro128 {
    fn next32(&mut self) -> u32 {
        self.next64() as u32
    }

    #[inline]
    fn next64(&mut self) -> u64 {
        let output = self.s0.wrapping_add(self.s1);
        self.advance();
        output
    }
}

impl RandomEngine for Xoro128 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Xoro128
    }

    fn seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError> {
        [self.s0, self.s1] = expand_nonzero(Algorithm::Xoro128, seed, [0; 2])?;
        Ok(())
    }

    fn merge_seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError> {
        [self.s0, self.s1] = expand_nonzero(Algorithm::Xoro128, seed, self.state())?;
        Ok(())
    }

    fn skip_ahead_magnitude(&self) -> i32 {
        SKIP_MAGNITUDE
    }

    fn skip_ahead(&mut self) -> Result<(), EngineError> {
        trace!(algorithm = %Algorithm::Xoro128, magnitude = SKIP_MAGNITUDE, "skip ahead");
        jump::apply(self, &JUMP_2_64);
        Ok(())
    }

    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::new(Algorithm::Xoro128, self.state().to_vec(), 0)
    }

    fn restore(&mut self, snapshot: &EngineSnapshot) -> Result<(), EngineError> {
        expect_algorithm(Algorithm::Xoro128, snapshot)?;
        *self = Self::from_state([snapshot.words[0], snapshot.words[1]])?;
        Ok(())
    }
}
