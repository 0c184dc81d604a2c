//! Deterministic random number generation
//!
//! Four interchangeable generators sharing one capability set:
//!
//! - **Mix64**: 64-bit splitting/mixing generator, also the seed expander
//! - **Xor128**: 128-bit xorshift+
//! - **Xoro128**: 128-bit xoroshiro+
//! - **Xor1024**: 1024-bit xorshift* over a 16-word ring
//!
//! CRITICAL: every generator is a plain owned value. Cloning produces an
//! independent copy; nothing is shared between instances.

pub mod mix64;
pub mod xor1024;
pub mod xor128;
pub mod xoro128;

use crate::config::ConfigError;
use crate::seed::{Seed, SeedError};
use crate::snapshot::{EngineSnapshot, SnapshotError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use mix64::Mix64;
use xor1024::Xor1024;
use xor128::Xor128;
use xoro128::Xoro128;

/// Skip magnitude reported for a direction an algorithm cannot jump in.
pub const UNSUPPORTED_SKIP: i32 = -1;

/// Errors raised by generator operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("{operation} is not supported by {algorithm}")]
    Unsupported {
        algorithm: Algorithm,
        operation: &'static str,
    },

    #[error("Invalid {algorithm} state: {reason}")]
    InvalidState {
        algorithm: Algorithm,
        reason: String,
    },

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Identifies one of the generator algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Mix64,
    Xor128,
    Xoro128,
    Xor1024,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Mix64,
        Algorithm::Xor128,
        Algorithm::Xoro128,
        Algorithm::Xor1024,
    ];

    /// Stable lowercase name, also used by serde and the snapshot checksum
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Mix64 => "mix64",
            Algorithm::Xor128 => "xor128",
            Algorithm::Xoro128 => "xoro128",
            Algorithm::Xor1024 => "xor1024",
        }
    }

    /// Number of 64-bit words of raw state
    pub fn state_words(self) -> usize {
        match self {
            Algorithm::Mix64 => 1,
            Algorithm::Xor128 | Algorithm::Xoro128 => 2,
            Algorithm::Xor1024 => 16,
        }
    }

    /// Whether the all-zero state is forbidden
    pub fn requires_nonzero_state(self) -> bool {
        !matches!(self, Algorithm::Mix64)
    }

    pub(crate) fn tag(self) -> u8 {
        match self {
            Algorithm::Mix64 => 0,
            Algorithm::Xor128 => 1,
            Algorithm::Xoro128 => 2,
            Algorithm::Xor1024 => 3,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(s.to_string()))
    }
}

/// Raw bit draws
///
/// The only capability seeding and range sampling need. Anything that can
/// produce words, including generators outside this crate, can implement it.
pub trait BitSource {
    /// Next 32 random bits, advancing state
    fn next32(&mut self) -> u32;

    /// Next 64 random bits, advancing state
    fn next64(&mut self) -> u64;

    /// Next 32-bit draw masked down to its low `bits` bits
    ///
    /// # Panics
    /// Panics if `bits > 32`
    fn next32_bits(&mut self, bits: u32) -> u32 {
        assert!(bits <= 32, "bit count {} exceeds 32", bits);
        let value = self.next32();
        if bits == 0 {
            0
        } else {
            value & (u32::MAX >> (32 - bits))
        }
    }

    /// Next 64-bit draw masked down to its low `bits` bits
    ///
    /// # Panics
    /// Panics if `bits > 64`
    fn next64_bits(&mut self, bits: u32) -> u64 {
        assert!(bits <= 64, "bit count {} exceeds 64", bits);
        let value = self.next64();
        if bits == 0 {
            0
        } else {
            value & (u64::MAX >> (64 - bits))
        }
    }
}

/// Full capability set shared by every generator algorithm
pub trait RandomEngine: BitSource {
    fn algorithm(&self) -> Algorithm;

    /// Replace the state with one derived from `seed`
    ///
    /// On error the generator is left unchanged.
    fn seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError>;

    /// XOR material derived from `seed` into the current state
    ///
    /// On error the generator is left unchanged.
    fn merge_seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError>;

    /// Exponent `M` such that [`skip_ahead`](Self::skip_ahead) advances `2^M` steps
    fn skip_ahead_magnitude(&self) -> i32;

    /// Exponent for [`skip_back`](Self::skip_back), negative when unsupported
    fn skip_back_magnitude(&self) -> i32 {
        UNSUPPORTED_SKIP
    }

    fn skip_ahead(&mut self) -> Result<(), EngineError>;

    fn skip_back(&mut self) -> Result<(), EngineError> {
        Err(EngineError::Unsupported {
            algorithm: self.algorithm(),
            operation: "skip_back",
        })
    }

    /// Capture the raw state for persistence
    fn snapshot(&self) -> EngineSnapshot;

    /// Restore a state captured by [`snapshot`](Self::snapshot)
    ///
    /// On error the generator is left unchanged.
    fn restore(&mut self, snapshot: &EngineSnapshot) -> Result<(), EngineError>;
}

/// Closed set of generator variants
///
/// Use this when the algorithm is chosen at runtime (configuration, restored
/// snapshots). Each variant can also be used directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Engine {
    Mix64(Mix64),
    Xor128(Xor128),
    Xoro128(Xoro128),
    Xor1024(Xor1024),
}

macro_rules! dispatch {
    ($engine:expr, $inner:ident => $body:expr) => {
        match $engine {
            Engine::Mix64($inner) => $body,
            Engine::Xor128($inner) => $body,
            Engine::Xoro128($inner) => $body,
            Engine::Xor1024($inner) => $body,
        }
    };
}

impl Engine {
    /// Create a generator of the given algorithm from seed material
    pub fn new(algorithm: Algorithm, seed: Seed<'_>) -> Result<Self, SeedError> {
        Ok(match algorithm {
            Algorithm::Mix64 => Engine::Mix64(Mix64::new(seed)),
            Algorithm::Xor128 => Engine::Xor128(Xor128::new(seed)?),
            Algorithm::Xoro128 => Engine::Xoro128(Xoro128::new(seed)?),
            Algorithm::Xor1024 => Engine::Xor1024(Xor1024::new(seed)?),
        })
    }

    /// Rebuild a generator of whatever algorithm the snapshot records
    pub fn from_snapshot(snapshot: &EngineSnapshot) -> Result<Self, EngineError> {
        snapshot.verify()?;
        let words = &snapshot.words;
        Ok(match snapshot.algorithm {
            Algorithm::Mix64 => Engine::Mix64(Mix64::from_state(words[0])),
            Algorithm::Xor128 => Engine::Xor128(Xor128::from_state([words[0], words[1]])?),
            Algorithm::Xoro128 => Engine::Xoro128(Xoro128::from_state([words[0], words[1]])?),
            Algorithm::Xor1024 => {
                let mut state = [0u64; 16];
                state.copy_from_slice(words);
                Engine::Xor1024(Xor1024::from_state(state, snapshot.offset as usize)?)
            }
        })
    }
}

impl BitSource for Engine {
    fn next32(&mut self) -> u32 {
        dispatch!(self, inner => inner.next32())
    }

    fn next64(&mut self) -> u64 {
        dispatch!(self, inner => inner.next64())
    }
}

impl RandomEngine for Engine {
    fn algorithm(&self) -> Algorithm {
        dispatch!(self, inner => inner.algorithm())
    }

    fn seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError> {
        dispatch!(self, inner => inner.seed(seed))
    }

    fn merge_seed(&mut self, seed: Seed<'_>) -> Result<(), SeedError> {
        dispatch!(self, inner => inner.merge_seed(seed))
    }

    fn skip_ahead_magnitude(&self) -> i32 {
        dispatch!(self, inner => inner.skip_ahead_magnitude())
    }

    fn skip_back_magnitude(&self) -> i32 {
        dispatch!(self, inner => inner.skip_back_magnitude())
    }

    fn skip_ahead(&mut self) -> Result<(), EngineError> {
        dispatch!(self, inner => inner.skip_ahead())
    }

    fn skip_back(&mut self) -> Result<(), EngineError> {
        dispatch!(self, inner => inner.skip_back())
    }

    fn snapshot(&self) -> EngineSnapshot {
        dispatch!(self, inner => inner.snapshot())
    }

    fn restore(&mut self, snapshot: &EngineSnapshot) -> Result<(), EngineError> {
        dispatch!(self, inner => inner.restore(snapshot))
    }
}

impl From<Mix64> for Engine {
    fn from(inner: Mix64) -> Self {
        Engine::Mix64(inner)
    }
}

impl From<Xor128> for Engine {
    fn from(inner: Xor128) -> Self {
        Engine::Xor128(inner)
    }
}

impl From<Xoro128> for Engine {
    fn from(inner: Xoro128) -> Self {
        Engine::Xoro128(inner)
    }
}

impl From<Xor1024> for Engine {
    fn from(inner: Xor1024) -> Self {
        Engine::Xor1024(inner)
    }
}

/// Reject a snapshot captured from a different algorithm
pub(crate) fn expect_algorithm(
    expected: Algorithm,
    snapshot: &EngineSnapshot,
) -> Result<(), EngineError> {
    if snapshot.algorithm != expected {
        return Err(SnapshotError::AlgorithmMismatch {
            expected,
            found: snapshot.algorithm,
        }
        .into());
    }
    snapshot.verify()?;
    Ok(())
}
