//! Xor1024: 1024-bit xorshift*
//!
//! Sixteen 64-bit words in a ring with a moving offset. Each step combines the
//! word at the offset with the next one, stores the result in place of the
//! next word, and scrambles it with a fixed odd multiplier.

use super::{expect_algorithm, Algorithm, BitSource, EngineError, RandomEngine};
use crate::jump::{self, LinearState};
use crate::seed::{entropy_seed, expand_nonzero, Seed, SeedError};
use crate::snapshot::EngineSnapshot;
use tracing::trace;

pub const RING_WORDS: usize = 16;

const MULTIPLIER: u64 = 0x1066_89D4_5497_FDB5;

/// `T^(2^512)` as a polynomial in the transition
const JUMP_2_512: [u64; RING_WORDS] = [
    0x8424_2F96_ECA9_C41D,
    0xA3C6_5B87_76F9_6855,
    0x5B34_A39F_070B_5837,
    0x4489_AFFC_E4F3_1A1E,
    0x2FFE_EB0A_4831_6F40,
    0xDC2D_9891_FE68_C022,
    0x3659_132B_B12F_EA70,
    0xAAC1_7D8E_FA43_CAB8,
    0xC4CB_8155_9098_9B13,
    0x5EE9_7528_3D71_C93B,
    0x6915_48C8_6C1B_D540,
    0x7910_C41D_10A1_E6A5,
    0x0B5F_C645_63B3_E2A8,
    0x047F_7684_E9FC_949D,
    0xB991_81F2_D8F6_85CA,
    0x2846_00E3_F30E_38C3,
];

const SKIP_MAGNITUDE: i32 = 512;

/// 1024-bit xorshift* generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xor1024 {
    state: [u64; RING_WORDS],
    offset: usize,
}

impl Xor1024 {
    /// Create a generator from seed material, with the ring offset at 0
    pub fn new(seed: Seed<'_>) -> Result<Self, SeedError> {
        let state = expand_nonzero(Algorithm::Xor1024, seed, [0; RING_WORDS])?;
        Ok(Self { state, offset: 0 })
    }

    /// Create a generator from raw ring words and offset
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidState`] if every word is zero or the
    /// offset is outside the ring
    pub fn from_state(state: [u64; RING_WORDS], offset: usize) -> Result<Self, EngineError> {
        if offset >= RING_WORDS {
            return Err(EngineError::InvalidState {
                algorithm: Algorithm::Xor1024,
                reason: format!("ring offset {} out of range 0..{}", offset, RING_WORDS),
            });
        }
        if state.iter().all(|&word| word == 0) {
            return Err(EngineError::InvalidState {
                algorithm: Algorithm::Xor1024,
                reason: "state must not be all zero".to_string(),
            });
        }
        Ok(Self { state, offset })
    }

    pub fn from_entropy() -> Result<Self, SeedError> {
        Self::new(Seed::Int(entropy_seed()))
    }

    /// Raw ring words, in storage order
    pub fn state(&self) -> &[u64; RING_WORDS] {
        &self.state
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    fn advance(&mut self) -> u64 {
        let x = self.state[self.offset];
        self.offset = (self.offset + 1) % RING_WORDS;
        let mut y = self.state[self.offset];
        y ^= y << 31;
        let mixed = y ^ x ^ (y >> 11) ^ (x >> 30);
        self.state[self.offset] = mixed;
        mixed
    }
}

impl LinearState<RING_WORDS> for Xor1024 {
    fn words(&self) -> [u64; RING_WORDS] {
        std::array::from_fn(|j| self.state[(self.offset + j) % RING_WORDS])
    }

    fn replace_words(&mut self, words: [u64; RING_WORDS]) {
        for (j, word) in words.into_iter().enumerate() {
            self.state[(self.offset + j) % RING_WORDS] = word;
        }
    }

    fn step(&mut self) {
        self.advance();
    }
}

impl BitSource for Xor1024 {
    fn next32(&mut self) -> u32 {
        self.next64() as u32
    }

    #[inline]
    fn next64(&mut self) -> u64 {
        self.advance().wrapping_mul(MULTIPLIER)
    }
}

impl RandomEngine for Xor1024 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Xor1024
    }

    fn seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError> {
        self.state = expand_nonzero(Algorithm::Xor1024, seed, [0; RING_WORDS])?;
        self.offset = 0;
        Ok(())
    }

    fn merge_seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError> {
        self.state = expand_nonzero(Algorithm::Xor1024, seed, self.state)?;
        Ok(())
    }

    fn skip_ahead_magnitude(&self) -> i32 {
        SKIP_MAGNITUDE
    }

    fn skip_ahead(&mut self) -> Result<(), EngineError> {
        trace!(algorithm = %Algorithm::Xor1024, magnitude = SKIP_MAGNITUDE, "skip ahead");
        jump::apply(self, &JUMP_2_512);
        Ok(())
    }

    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::new(Algorithm::Xor1024, self.state.to_vec(), self.offset as u8)
    }

    fn restore(&mut self, snapshot: &EngineSnapshot) -> Result<(), EngineError> {
        expect_algorithm(Algorithm::Xor1024, snapshot)?;
        let mut state = [0u64; RING_WORDS];
        state.copy_from_slice(&snapshot.words);
        *self = Self::from_state(state, snapshot.offset as usize)?;
        Ok(())
    }
}
