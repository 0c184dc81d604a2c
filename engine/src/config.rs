//! Engine configuration
//!
//! Declarative description of a generator, loadable from JSON:
//!
//! ```json
//! { "algorithm": "xor1024", "seed": 42, "skip_ahead": 2 }
//! ```
//!
//! A missing seed means entropy seeding. `skip_ahead` applies that many jumps
//! after seeding, which is how independent parallel streams are carved out of
//! one seed.

use crate::rng::{Algorithm, Engine, EngineError, RandomEngine};
use crate::seed::{entropy_seed, Seed};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown algorithm '{0}' (expected mix64, xor128, xoro128 or xor1024)")]
    UnknownAlgorithm(String),

    #[error("Config parse error: {0}")]
    Parse(String),
}

/// Seed given in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedConfig {
    Int(u64),
    Text(String),
}

impl SeedConfig {
    pub fn as_seed(&self) -> Seed<'_> {
        match self {
            SeedConfig::Int(value) => Seed::Int(*value),
            SeedConfig::Text(text) => Seed::Text(text),
        }
    }
}

/// Engine construction parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub algorithm: Algorithm,

    /// Seed material; `None` seeds from entropy
    #[serde(default)]
    pub seed: Option<SeedConfig>,

    /// Number of `skip_ahead` calls applied after seeding
    #[serde(default)]
    pub skip_ahead: u32,
}

impl EngineConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            seed: None,
            skip_ahead: 0,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build a freshly seeded engine
    pub fn build(&self) -> Result<Engine, EngineError> {
        let mut engine = match &self.seed {
            Some(seed) => Engine::new(self.algorithm, seed.as_seed())?,
            None => Engine::new(self.algorithm, Seed::Int(entropy_seed()))?,
        };
        for _ in 0..self.skip_ahead {
            engine.skip_ahead()?;
        }
        Ok(engine)
    }
}
