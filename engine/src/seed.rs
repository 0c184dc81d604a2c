//! Seed material
//!
//! Seeds arrive as integers, strings, byte or word buffers, or another
//! generator. Byte material is hashed with FNV-1a into a 64-bit value; wider
//! generators expand that value through a [`Mix64`] so a small seed still
//! fills every state word.
//!
//! # Non-zero state
//!
//! The xorshift family cannot hold the all-zero state. Expansion redraws the
//! full state up to [`MAX_SEED_ATTEMPTS`] times before giving up with
//! [`SeedError::DegenerateState`].

use crate::rng::mix64::Mix64;
use crate::rng::{Algorithm, BitSource};
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

/// Total draws attempted before seeding reports a degenerate state
pub const MAX_SEED_ATTEMPTS: u32 = 4;

const FNV32_OFFSET: u32 = 0x811C_9DC5;
const FNV32_PRIME: u32 = 0x0100_0193;
const FNV64_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
const FNV64_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Errors that can occur while seeding a generator
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("Seed material produced an all-zero {algorithm} state after {attempts} attempts")]
    DegenerateState { algorithm: Algorithm, attempts: u32 },
}

/// Entropy accepted by `seed` and `merge_seed`
pub enum Seed<'a> {
    /// Hashed as its 8 little-endian bytes
    Int(u64),
    /// Hashed as UTF-8
    Text(&'a str),
    Bytes(&'a [u8]),
    /// Hashed as the little-endian bytes of each word
    Words(&'a [u32]),
    /// Words are drawn directly from another generator
    Source(&'a mut dyn BitSource),
}

impl fmt::Debug for Seed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Seed::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Seed::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Seed::Words(words) => f.debug_tuple("Words").field(words).finish(),
            // Generators carry no Debug bound
            Seed::Source(_) => f.write_str("Source(..)"),
        }
    }
}

enum Material<'a> {
    Hashed(u64),
    Drawn(&'a mut dyn BitSource),
}

impl<'a> Seed<'a> {
    fn into_material(self) -> Material<'a> {
        match self {
            Seed::Int(value) => Material::Hashed(fnv1a_64(&value.to_le_bytes())),
            Seed::Text(text) => Material::Hashed(fnv1a_64(text.as_bytes())),
            Seed::Bytes(bytes) => Material::Hashed(fnv1a_64(bytes)),
            Seed::Words(words) => Material::Hashed(
                words
                    .iter()
                    .fold(FNV64_OFFSET, |hash, word| extend_fnv1a_64(hash, &word.to_le_bytes())),
            ),
            Seed::Source(source) => Material::Drawn(source),
        }
    }
}

impl From<u64> for Seed<'_> {
    fn from(value: u64) -> Self {
        Seed::Int(value)
    }
}

impl<'a> From<&'a str> for Seed<'a> {
    fn from(text: &'a str) -> Self {
        Seed::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Seed<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Seed::Bytes(bytes)
    }
}

impl<'a> From<&'a [u32]> for Seed<'a> {
    fn from(words: &'a [u32]) -> Self {
        Seed::Words(words)
    }
}

fn extend_fnv1a_64(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV64_PRIME);
    }
    hash
}

/// 64-bit FNV-1a hash
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    extend_fnv1a_64(FNV64_OFFSET, bytes)
}

/// 32-bit FNV-1a hash
///
/// Seeding itself always hashes to 64 bits. This is exported for callers
/// that derive 32-bit keys (stream labels, bucket ids) from the same
/// material they seed with.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV32_OFFSET, |hash, &byte| {
        (hash ^ byte as u32).wrapping_mul(FNV32_PRIME)
    })
}

/// Non-reproducible seed for generators that do not need replay
///
/// Mixes the process's randomly keyed hasher with the wall clock and a
/// per-process counter, so back-to-back calls still differ.
pub fn entropy_seed() -> u64 {
    static CALLS: AtomicU64 = AtomicU64::new(0);

    let mut hasher = RandomState::new().build_hasher();
    CALLS.fetch_add(1, Ordering::Relaxed).hash(&mut hasher);
    if let Ok(elapsed) = SystemTime::now().duration_since(UNIX_EPOCH) {
        elapsed.as_nanos().hash(&mut hasher);
    }
    hasher.finish()
}

/// One 64-bit word of seed material (single-word generators)
pub(crate) fn seed_word(seed: Seed<'_>) -> u64 {
    match seed.into_material() {
        Material::Hashed(hash) => hash,
        Material::Drawn(source) => source.next64(),
    }
}

/// XOR freshly drawn words into `base` until the result is not all zero
///
/// Pass an all-zero `base` to reseed, or the current state to merge.
pub(crate) fn expand_nonzero<const N: usize>(
    algorithm: Algorithm,
    seed: Seed<'_>,
    base: [u64; N],
) -> Result<[u64; N], SeedError> {
    let mut expander: Mix64;
    let source: &mut dyn BitSource = match seed.into_material() {
        Material::Drawn(source) => source,
        Material::Hashed(hash) => {
            expander = Mix64::from_state(hash);
            &mut expander
        }
    };

    for attempt in 1..=MAX_SEED_ATTEMPTS {
        let mut words = base;
        for word in words.iter_mut() {
            *word ^= source.next64();
        }
        if words.iter().any(|&word| word != 0) {
            return Ok(words);
        }
        debug!(%algorithm, attempt, "seed material produced an all-zero state, redrawing");
    }

    warn!(%algorithm, attempts = MAX_SEED_ATTEMPTS, "giving up on degenerate seed material");
    Err(SeedError::DegenerateState {
        algorithm,
        attempts: MAX_SEED_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Emits a scripted sequence of words, then zeros
    struct Scripted {
        words: Vec<u64>,
        drawn: usize,
    }

    impl BitSource for Scripted {
        fn next32(&mut self) -> u32 {
            self.next64() as u32
        }

        fn next64(&mut self) -> u64 {
            let word = self.words.get(self.drawn).copied().unwrap_or(0);
            self.drawn += 1;
            word
        }
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a_64(b""), 0xCBF2_9CE4_8422_2325);
        assert_eq!(fnv1a_64(b"hello"), 0xA430_D846_80AA_BD0B);
        assert_eq!(fnv1a_32(b""), 0x811C_9DC5);
        assert_eq!(fnv1a_32(b"hello"), 0x4F9F_2CAB);
    }

    #[test]
    fn test_seed_debug_output() {
        assert_eq!(format!("{:?}", Seed::Int(7)), "Int(7)");
        assert_eq!(format!("{:?}", Seed::Text("abc")), "Text(\"abc\")");
        assert_eq!(format!("{:?}", Seed::Words(&[1, 2])), "Words([1, 2])");

        let mut source = Scripted {
            words: vec![],
            drawn: 0,
        };
        assert_eq!(format!("{:?}", Seed::Source(&mut source)), "Source(..)");
        assert_eq!(source.drawn, 0);
    }

    #[test]
    fn test_int_seed_hashes_little_endian_bytes() {
        assert_eq!(seed_word(Seed::Int(42)), 0xFF3A_DD6B_3789_DAEF);
        assert_eq!(seed_word(Seed::Int(42)), fnv1a_64(&42u64.to_le_bytes()));
    }

    #[test]
    fn test_words_seed_matches_equivalent_bytes() {
        let words = [0x0403_0201u32, 0x0807_0605];
        let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(seed_word(Seed::Words(&words)), seed_word(Seed::Bytes(&bytes)));
    }

    #[test]
    fn test_source_seed_draws_from_generator() {
        let mut source = Scripted {
            words: vec![0xDEAD_BEEF],
            drawn: 0,
        };
        assert_eq!(seed_word(Seed::Source(&mut source)), 0xDEAD_BEEF);
        assert_eq!(source.drawn, 1);
    }

    #[test]
    fn test_expand_retries_past_zero_draws() {
        // First attempt draws (0, 0), second draws (0, 5)
        let mut source = Scripted {
            words: vec![0, 0, 0, 5],
            drawn: 0,
        };
        let words = expand_nonzero(Algorithm::Xor128, Seed::Source(&mut source), [0u64; 2]);
        assert_eq!(words, Ok([0, 5]));
        assert_eq!(source.drawn, 4);
    }

    #[test]
    fn test_expand_gives_up_after_bounded_attempts() {
        let mut source = Scripted {
            words: Vec::new(),
            drawn: 0,
        };
        let result = expand_nonzero(Algorithm::Xoro128, Seed::Source(&mut source), [0u64; 2]);
        assert_eq!(
            result,
            Err(SeedError::DegenerateState {
                algorithm: Algorithm::Xoro128,
                attempts: MAX_SEED_ATTEMPTS,
            })
        );
        assert_eq!(source.drawn, 2 * MAX_SEED_ATTEMPTS as usize);
    }

    #[test]
    fn test_merge_that_cancels_state_is_redrawn() {
        let mut source = Scripted {
            words: vec![7, 9, 1, 1],
            drawn: 0,
        };
        let merged = expand_nonzero(Algorithm::Xor128, Seed::Source(&mut source), [7u64, 9]);
        assert_eq!(merged, Ok([6, 8]));
    }

    #[test]
    fn test_entropy_seeds_differ() {
        assert_ne!(entropy_seed(), entropy_seed());
    }
}
