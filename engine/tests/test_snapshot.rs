//! Snapshot Tests - Save/Restore Generator State
//!
//! Critical invariants tested:
//! - Determinism: a restored generator continues the original sequence
//! - Format integrity: JSON and binary forms reproduce the same snapshot
//! - Validation: foreign, truncated or tampered snapshots are rejected

use random_engine_core::{
    Algorithm, BitSource, Engine, EngineError, EngineSnapshot, RandomEngine, Seed,
    SnapshotError, Xor1024, Xor128,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Engine advanced a little so snapshots are taken mid-stream
fn warmed_up(algorithm: Algorithm) -> Engine {
    let mut engine = Engine::new(algorithm, Seed::Text("checkpoint")).unwrap();
    for _ in 0..21 {
        engine.next64();
    }
    engine
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_restored_engine_continues_sequence() {
    for algorithm in Algorithm::ALL {
        let mut original = warmed_up(algorithm);
        let snapshot = original.snapshot();

        let expected: Vec<u64> = (0..50).map(|_| original.next64()).collect();

        let mut restored = Engine::from_snapshot(&snapshot).unwrap();
        let actual: Vec<u64> = (0..50).map(|_| restored.next64()).collect();

        assert_eq!(expected, actual, "{}: restored stream diverged", algorithm);
    }
}

#[test]
fn test_restore_rewinds_in_place() {
    for algorithm in Algorithm::ALL {
        let mut engine = warmed_up(algorithm);
        let snapshot = engine.snapshot();
        let first = engine.next64();

        engine.skip_ahead().unwrap();
        engine.restore(&snapshot).unwrap();

        assert_eq!(engine.next64(), first, "{}", algorithm);
    }
}

#[test]
fn test_xor1024_snapshot_keeps_ring_offset() {
    let mut rng = Xor1024::new(Seed::Int(11)).unwrap();
    for _ in 0..5 {
        rng.next64();
    }
    let snapshot = rng.snapshot();
    assert_eq!(snapshot.offset, 5);

    let mut restored = Xor1024::new(Seed::Int(0)).unwrap();
    restored.restore(&snapshot).unwrap();
    assert_eq!(restored, rng);
}

// ============================================================================
// Formats
// ============================================================================

#[test]
fn test_json_and_binary_forms_agree() {
    for algorithm in Algorithm::ALL {
        let snapshot = warmed_up(algorithm).snapshot();

        let json = snapshot.to_json().unwrap();
        assert_eq!(EngineSnapshot::from_json(&json).unwrap(), snapshot);

        let bytes = snapshot.to_bytes().unwrap();
        assert_eq!(bytes.len(), 3 + 8 * algorithm.state_words());
        assert_eq!(EngineSnapshot::from_bytes(&bytes).unwrap(), snapshot);
    }
}

#[test]
fn test_json_names_algorithm_in_snake_case() {
    let snapshot = Xor128::from_state([1, 2]).unwrap().snapshot();
    let json = snapshot.to_json().unwrap();
    assert!(json.contains("\"algorithm\":\"xor128\""), "unexpected JSON: {}", json);
    assert!(json.contains("\"words\":[1,2]"), "unexpected JSON: {}", json);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_restore_rejects_other_algorithm() {
    let foreign = warmed_up(Algorithm::Xoro128).snapshot();
    let mut engine = warmed_up(Algorithm::Xor128);
    let before = engine.clone();

    assert_eq!(
        engine.restore(&foreign),
        Err(EngineError::Snapshot(SnapshotError::AlgorithmMismatch {
            expected: Algorithm::Xor128,
            found: Algorithm::Xoro128,
        }))
    );
    assert_eq!(engine, before);
}

#[test]
fn test_tampered_json_rejected() {
    let snapshot = warmed_up(Algorithm::Mix64).snapshot();
    let mut tampered = snapshot.clone();
    tampered.words[0] ^= 1;

    let json = serde_json::to_string(&tampered).unwrap();
    assert!(matches!(
        EngineSnapshot::from_json(&json),
        Err(SnapshotError::ChecksumMismatch { .. })
    ));
    assert!(matches!(
        Engine::from_snapshot(&tampered),
        Err(EngineError::Snapshot(SnapshotError::ChecksumMismatch { .. }))
    ));
}

#[test]
fn test_out_of_range_ring_offset_rejected() {
    let mut snapshot = warmed_up(Algorithm::Xor1024).snapshot();
    snapshot = EngineSnapshot::new(Algorithm::Xor1024, snapshot.words, 16);

    assert!(matches!(
        Engine::from_snapshot(&snapshot),
        Err(EngineError::InvalidState {
            algorithm: Algorithm::Xor1024,
            ..
        })
    ));
}

#[test]
fn test_binary_word_count_must_match_algorithm() {
    // Tag 3 (xor1024) claiming only two words
    let mut bytes = vec![3u8, 0, 2];
    bytes.extend_from_slice(&[1u8; 16]);

    assert_eq!(
        EngineSnapshot::from_bytes(&bytes),
        Err(SnapshotError::WordCount {
            algorithm: Algorithm::Xor1024,
            expected: 16,
            found: 2,
        })
    );
}
