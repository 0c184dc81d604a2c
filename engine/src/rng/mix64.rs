//! Mix64 splitting generator
//!
//! A Weyl counter stepped by the 64-bit golden-ratio constant, passed through
//! two xor-shift/multiply rounds and a final xor-shift. Every 64-bit state is
//! valid, which makes it the seed expander for the wider generators.
//!
//! Because the state is a plain counter, skipping in either direction is a
//! single addition.

use super::{expect_algorithm, Algorithm, BitSource, EngineError, RandomEngine};
use crate::seed::{entropy_seed, seed_word, Seed, SeedError};
use crate::snapshot::EngineSnapshot;
use tracing::trace;

const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const MIX_A: u64 = 0xBF58_476D_1CE4_E5B9;
const MIX_B: u64 = 0x94D0_49BB_1331_11EB;

/// Steps covered by one skip, as a power of two
const SKIP_MAGNITUDE: i32 = 32;

/// 64-bit splitting/mixing generator
///
/// # Example
/// ```
/// use random_engine_core::{BitSource, Mix64};
///
/// let mut rng = Mix64::from_state(0);
/// assert_eq!(rng.next64(), 0xE220_A839_7B1D_CDAF);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mix64 {
    state: u64,
}

impl Mix64 {
    /// Create a generator from seed material
    pub fn new(seed: Seed<'_>) -> Self {
        Self::from_state(seed_word(seed))
    }

    /// Create a generator from a raw state word
    pub fn from_state(state: u64) -> Self {
        Self { state }
    }

    pub fn from_entropy() -> Self {
        Self::from_state(entropy_seed())
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

impl BitSource for Mix64 {
    fn next32(&mut self) -> u32 {
        self.next64() as u32
    }

    fn next64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(MIX_A);
        z = (z ^ (z >> 27)).wrapping_mul(MIX_B);
        z ^ (z >> 31)
    }
}

impl RandomEngine for Mix64 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Mix64
    }

    fn seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError> {
        self.state = seed_word(seed);
        Ok(())
    }

    fn merge_seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError> {
        self.state ^= seed_word(seed);
        Ok(())
    }

    fn skip_ahead_magnitude(&self) -> i32 {
        SKIP_MAGNITUDE
    }

    fn skip_back_magnitude(&self) -> i32 {
        SKIP_MAGNITUDE
    }

    fn skip_ahead(&mut self) -> Result<(), EngineError> {
        trace!(algorithm = %Algorithm::Mix64, magnitude = SKIP_MAGNITUDE, "skip ahead");
        self.state = self.state.wrapping_add(GAMMA << SKIP_MAGNITUDE);
        Ok(())
    }

    fn skip_back(&mut self) -> Result<(), EngineError> {
        trace!(algorithm = %Algorithm::Mix64, magnitude = SKIP_MAGNITUDE, "skip back");
        self.state = self.state.wrapping_sub(GAMMA << SKIP_MAGNITUDE);
        Ok(())
    }

    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::new(Algorithm::Mix64, vec![self.state], 0)
    }

    fn restore(&mut self, snapshot: &EngineSnapshot) -> Result<(), EngineError> {
        expect_algorithm(Algorithm::Mix64, snapshot)?;
        self.state = snapshot.words[0];
        Ok(())
    }
}
