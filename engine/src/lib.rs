//! Random Engine Core - Rust Engine
//!
//! Interchangeable pseudo-random bit-stream generators with bias-free bounded
//! ranges and logarithmic-time skip-ahead.
//!
//! # Architecture
//!
//! - **bits**: Table-driven ceiling-log2 used to size rejection masks
//! - **rng**: Generator algorithms (Mix64, Xor128, Xoro128, Xor1024)
//! - **seed**: Seed material, FNV-1a hashing, non-zero state expansion
//! - **range**: Unbiased bounded draws via masked rejection sampling
//! - **jump**: GF(2) polynomial jump-ahead for the xorshift family
//! - **snapshot**: Save/restore of raw generator state
//! - **config**: Serde-driven engine construction
//!
//! # Critical Invariants
//!
//! 1. Same algorithm + same seed material produces the same sequence, bit for bit
//! 2. Xorshift-family generators never hold the all-zero state
//! 3. Bounded draws carry no modulo bias

pub mod bits;
pub mod config;
mod jump;
pub mod range;
pub mod rng;
pub mod seed;
pub mod snapshot;

// Re-exports for convenience
pub use config::{ConfigError, EngineConfig, SeedConfig};
pub use range::{RangeError, RangeExt};
pub use rng::{
    mix64::Mix64, xor1024::Xor1024, xor128::Xor128, xoro128::Xoro128, Algorithm, BitSource,
    Engine, EngineError, RandomEngine,
};
pub use seed::{entropy_seed, fnv1a_32, fnv1a_64, Seed, SeedError};
pub use snapshot::{EngineSnapshot, SnapshotError};
