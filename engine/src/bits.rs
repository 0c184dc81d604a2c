//! Bit-width lookups
//!
//! Ceiling-log2 helpers used to size the rejection mask of every bounded
//! draw. Inputs are inspected one byte at a time from the top, so each call
//! is a couple of branches and a single table lookup, with no loop.
//!
//! # Contract
//!
//! - `ceil_log2(n)`: smallest `b` with `n <= 2^b`, for `n >= 1`; `0` for `n == 0`
//! - `ceil_log2_plus1(n)`: `ceil_log2(n + 1)` without overflow at the type maximum,
//!   i.e. the number of bits needed to represent `n` itself

/// `CEIL_LOG2_PLUS1[i] = ceil(log2(i + 1))`, the bit length of `i`.
const CEIL_LOG2_PLUS1: [u8; 256] = build_ceil_log2_plus1();

/// `CEIL_LOG2[i] = ceil(log2(i))`, with `CEIL_LOG2[0] = 0`.
const CEIL_LOG2: [u8; 256] = build_ceil_log2();

const fn build_ceil_log2_plus1() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 1;
    while i < 256 {
        table[i] = table[i / 2] + 1;
        i += 1;
    }
    table
}

const fn build_ceil_log2() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 2;
    while i < 256 {
        table[i] = CEIL_LOG2_PLUS1[i - 1];
        i += 1;
    }
    table
}

#[inline]
fn bit_length_u32(n: u32) -> u32 {
    let byte_width = if n >> 16 != 0 {
        if n >> 24 != 0 {
            24 + CEIL_LOG2_PLUS1[(n >> 24) as usize]
        } else {
            16 + CEIL_LOG2_PLUS1[(n >> 16) as usize]
        }
    } else if n >> 8 != 0 {
        8 + CEIL_LOG2_PLUS1[(n >> 8) as usize]
    } else {
        CEIL_LOG2_PLUS1[n as usize]
    };
    byte_width as u32
}

#[inline]
fn bit_length_u64(n: u64) -> u32 {
    let upper = (n >> 32) as u32;
    if upper != 0 {
        32 + bit_length_u32(upper)
    } else {
        bit_length_u32(n as u32)
    }
}

/// Minimum number of bits `b` such that `n <= 2^b`.
///
/// Returns `0` for both `n == 0` and `n == 1`. Callers sizing an exclusive
/// range must reject `n == 0` themselves.
#[inline]
pub fn ceil_log2_u32(n: u32) -> u32 {
    if n <= 0xFF {
        CEIL_LOG2[n as usize] as u32
    } else {
        bit_length_u32(n - 1)
    }
}

/// `ceil_log2_u32(n + 1)`, valid for the whole `u32` domain.
#[inline]
pub fn ceil_log2_plus1_u32(n: u32) -> u32 {
    bit_length_u32(n)
}

/// 64-bit form of [`ceil_log2_u32`].
#[inline]
pub fn ceil_log2_u64(n: u64) -> u32 {
    if n <= 0xFF {
        CEIL_LOG2[n as usize] as u32
    } else {
        bit_length_u64(n - 1)
    }
}

/// 64-bit form of [`ceil_log2_plus1_u32`].
#[inline]
pub fn ceil_log2_plus1_u64(n: u64) -> u32 {
    bit_length_u64(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_ceil_log2(n: u64) -> u32 {
        if n <= 1 {
            0
        } else {
            64 - (n - 1).leading_zeros()
        }
    }

    #[test]
    fn test_tables_small_values() {
        assert_eq!(&CEIL_LOG2[..9], &[0, 0, 1, 2, 2, 3, 3, 3, 3]);
        assert_eq!(&CEIL_LOG2_PLUS1[..9], &[0, 1, 2, 2, 3, 3, 3, 3, 4]);
        assert_eq!(CEIL_LOG2[255], 8);
        assert_eq!(CEIL_LOG2_PLUS1[255], 8);
    }

    #[test]
    fn test_ceil_log2_u32_powers_of_two() {
        for b in 0..32 {
            let n = 1u32 << b;
            assert_eq!(ceil_log2_u32(n), b, "2^{} needs exactly {} bits", b, b);
            if n > 2 {
                assert_eq!(ceil_log2_u32(n - 1), b);
            }
            assert_eq!(ceil_log2_u32(n + 1), b + 1);
        }
    }

    #[test]
    fn test_ceil_log2_u32_byte_boundaries() {
        // Values whose top byte alone would under-count
        assert_eq!(ceil_log2_u32(0x100), 8);
        assert_eq!(ceil_log2_u32(0x101), 9);
        assert_eq!(ceil_log2_u32(0x1_0001), 17);
        assert_eq!(ceil_log2_u32(0x100_0001), 25);
        assert_eq!(ceil_log2_u32(u32::MAX), 32);
    }

    #[test]
    fn test_ceil_log2_plus1_at_type_maximum() {
        assert_eq!(ceil_log2_plus1_u32(u32::MAX), 32);
        assert_eq!(ceil_log2_plus1_u64(u64::MAX), 64);
        assert_eq!(ceil_log2_plus1_u32(0), 0);
        assert_eq!(ceil_log2_plus1_u64(0), 0);
    }

    #[test]
    fn test_ceil_log2_u64_matches_reference() {
        let samples = [
            2u64,
            3,
            255,
            256,
            257,
            0xFFFF_FFFF,
            0x1_0000_0000,
            0x1_0000_0001,
            0x8000_0000_0000_0000,
            0x8000_0000_0000_0001,
            u64::MAX,
        ];
        for &n in &samples {
            assert_eq!(ceil_log2_u64(n), reference_ceil_log2(n), "n = {:#x}", n);
            if n < u64::MAX {
                assert_eq!(ceil_log2_plus1_u64(n), reference_ceil_log2(n + 1), "n = {:#x}", n);
            }
        }
    }

    #[test]
    fn test_u32_and_u64_agree() {
        for n in (1u32..5000).chain([0x00FF_FFFF, 0x0100_0000, 0x7FFF_FFFF]) {
            assert_eq!(ceil_log2_u32(n), ceil_log2_u64(n as u64));
            assert_eq!(ceil_log2_plus1_u32(n), ceil_log2_plus1_u64(n as u64));
        }
    }
}
