//! Snapshot - Save/Restore Generator State
//!
//! Captures the raw state words of a generator (plus the ring offset for
//! Xor1024) so a stream can be paused and resumed bit-exactly.
//!
//! # Formats
//!
//! - JSON via serde, carrying a SHA256 checksum of the state
//! - Opaque binary blob: `[algorithm tag][offset][word count][words, little-endian]`
//!
//! # Critical Invariants
//!
//! - **Determinism**: a restored generator continues the original sequence
//! - **Validity**: word count, offset and checksum are checked before any state is replaced

use crate::rng::Algorithm;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

const HEADER_LEN: usize = 3;

/// Errors raised while decoding or validating a snapshot
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Snapshot is for {found}, expected {expected}")]
    AlgorithmMismatch {
        expected: Algorithm,
        found: Algorithm,
    },

    #[error("{algorithm} snapshot holds {found} words, expected {expected}")]
    WordCount {
        algorithm: Algorithm,
        expected: usize,
        found: usize,
    },

    #[error("{algorithm} snapshot carries ring offset {offset}, which it does not use")]
    UnexpectedOffset { algorithm: Algorithm, offset: u8 },

    #[error("Snapshot checksum mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch { expected: String, computed: String },

    #[error("Unknown algorithm tag {0}")]
    UnknownAlgorithmTag(u8),

    #[error("Snapshot blob truncated: need {expected} bytes, got {found}")]
    Truncated { expected: usize, found: usize },

    #[error("Snapshot JSON error: {0}")]
    Json(String),
}

/// Raw generator state at a point in its sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub algorithm: Algorithm,

    /// State words in storage order
    pub words: Vec<u64>,

    /// Ring offset (Xor1024 only, otherwise 0)
    pub offset: u8,

    /// SHA256 over algorithm name, offset and words
    pub checksum: String,
}

impl EngineSnapshot {
    pub fn new(algorithm: Algorithm, words: Vec<u64>, offset: u8) -> Self {
        let checksum = compute_checksum(algorithm, &words, offset);
        Self {
            algorithm,
            words,
            offset,
            checksum,
        }
    }

    /// Check structure and checksum
    ///
    /// Whether the state itself is valid (non-zero, offset in range) is
    /// decided by the generator when it is restored.
    pub fn verify(&self) -> Result<(), SnapshotError> {
        let expected = self.algorithm.state_words();
        if self.words.len() != expected {
            return Err(SnapshotError::WordCount {
                algorithm: self.algorithm,
                expected,
                found: self.words.len(),
            });
        }

        if self.algorithm != Algorithm::Xor1024 && self.offset != 0 {
            return Err(SnapshotError::UnexpectedOffset {
                algorithm: self.algorithm,
                offset: self.offset,
            });
        }

        let computed = compute_checksum(self.algorithm, &self.words, self.offset);
        if computed != self.checksum {
            debug!(algorithm = %self.algorithm, "rejecting snapshot with stale checksum");
            return Err(SnapshotError::ChecksumMismatch {
                expected: self.checksum.clone(),
                computed,
            });
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Json(e.to_string()))
    }

    /// Parse and verify a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| SnapshotError::Json(e.to_string()))?;
        snapshot.verify()?;
        Ok(snapshot)
    }

    /// Verify and encode as the opaque binary blob
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        self.verify()?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + self.words.len() * 8);
        bytes.push(self.algorithm.tag());
        bytes.push(self.offset);
        // At most 16 words once verified
        bytes.push(self.words.len() as u8);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        Ok(bytes)
    }

    /// Decode the opaque binary blob
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        if bytes.len() < HEADER_LEN {
            return Err(SnapshotError::Truncated {
                expected: HEADER_LEN,
                found: bytes.len(),
            });
        }

        let algorithm =
            Algorithm::from_tag(bytes[0]).ok_or(SnapshotError::UnknownAlgorithmTag(bytes[0]))?;
        let offset = bytes[1];
        let count = bytes[2] as usize;

        let expected_len = HEADER_LEN + count * 8;
        if bytes.len() != expected_len {
            return Err(SnapshotError::Truncated {
                expected: expected_len,
                found: bytes.len(),
            });
        }

        let words = bytes[HEADER_LEN..]
            .chunks_exact(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                u64::from_le_bytes(word)
            })
            .collect();

        let snapshot = Self::new(algorithm, words, offset);
        snapshot.verify()?;
        Ok(snapshot)
    }
}

fn compute_checksum(algorithm: Algorithm, words: &[u64], offset: u8) -> String {
    let mut hasher = Sha256::new();
    hasher.update(algorithm.name().as_bytes());
    hasher.update([offset]);
    for word in words {
        hasher.update(word.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}
