//! Bounded range sampling
//!
//! Unbiased integer draws by masked rejection: size a mask to the smallest
//! power of two covering the range, draw that many low bits, and redraw when
//! the value falls outside. Since the mask is at most twice the range, fewer
//! than two draws are needed on average, and every value in the range is
//! exactly equally likely (no modulo bias).
//!
//! All helpers are available on any [`BitSource`] through [`RangeExt`].

use crate::bits::{ceil_log2_plus1_u32, ceil_log2_plus1_u64, ceil_log2_u32, ceil_log2_u64};
use crate::rng::BitSource;
use thiserror::Error;

/// Errors that can occur when requesting a bounded draw
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Empty range: no values between {lower} and {upper}")]
    EmptyRange { lower: i128, upper: i128 },
}

fn empty(lower: impl Into<i128>, upper: impl Into<i128>) -> RangeError {
    RangeError::EmptyRange {
        lower: lower.into(),
        upper: upper.into(),
    }
}

/// Bounded draws for every bit source
///
/// Naming follows interval notation: `half_open` is `[lower, upper)`,
/// `closed` is `[lower, upper]`, `open` is `(lower, upper)`.
///
/// # Example
/// ```
/// use random_engine_core::{RangeExt, Seed, Xor128};
///
/// let mut rng = Xor128::new(Seed::Text("dice")).unwrap();
/// let face = rng.closed_u32(1, 6).unwrap();
/// assert!((1..=6).contains(&face));
/// ```
pub trait RangeExt: BitSource {
    /// Uniform value in `[0, upper)`
    ///
    /// # Errors
    /// Returns [`RangeError::EmptyRange`] if `upper == 0`
    fn less_than_u32(&mut self, upper: u32) -> Result<u32, RangeError> {
        if upper == 0 {
            return Err(empty(0u32, 0u32));
        }
        let bits = ceil_log2_u32(upper);
        loop {
            let value = self.next32_bits(bits);
            if value < upper {
                return Ok(value);
            }
        }
    }

    /// Uniform value in `[0, upper]`
    fn less_than_or_equal_u32(&mut self, upper: u32) -> u32 {
        let bits = ceil_log2_plus1_u32(upper);
        loop {
            let value = self.next32_bits(bits);
            if value <= upper {
                return value;
            }
        }
    }

    /// Uniform value in `[0, upper)`
    ///
    /// # Errors
    /// Returns [`RangeError::EmptyRange`] if `upper == 0`
    fn less_than_u64(&mut self, upper: u64) -> Result<u64, RangeError> {
        if upper == 0 {
            return Err(empty(0u64, 0u64));
        }
        let bits = ceil_log2_u64(upper);
        loop {
            let value = self.next64_bits(bits);
            if value < upper {
                return Ok(value);
            }
        }
    }

    /// Uniform value in `[0, upper]`
    fn less_than_or_equal_u64(&mut self, upper: u64) -> u64 {
        let bits = ceil_log2_plus1_u64(upper);
        loop {
            let value = self.next64_bits(bits);
            if value <= upper {
                return value;
            }
        }
    }

    fn half_open_u32(&mut self, lower: u32, upper: u32) -> Result<u32, RangeError> {
        if lower >= upper {
            return Err(empty(lower, upper));
        }
        Ok(lower + self.less_than_u32(upper - lower)?)
    }

    fn closed_u32(&mut self, lower: u32, upper: u32) -> Result<u32, RangeError> {
        if lower > upper {
            return Err(empty(lower, upper));
        }
        Ok(lower + self.less_than_or_equal_u32(upper - lower))
    }

    fn open_u32(&mut self, lower: u32, upper: u32) -> Result<u32, RangeError> {
        if upper <= lower || upper - lower < 2 {
            return Err(empty(lower, upper));
        }
        Ok(lower + 1 + self.less_than_u32(upper - lower - 1)?)
    }

    fn half_open_u64(&mut self, lower: u64, upper: u64) -> Result<u64, RangeError> {
        if lower >= upper {
            return Err(empty(lower, upper));
        }
        Ok(lower + self.less_than_u64(upper - lower)?)
    }

    fn closed_u64(&mut self, lower: u64, upper: u64) -> Result<u64, RangeError> {
        if lower > upper {
            return Err(empty(lower, upper));
        }
        Ok(lower + self.less_than_or_equal_u64(upper - lower))
    }

    fn open_u64(&mut self, lower: u64, upper: u64) -> Result<u64, RangeError> {
        if upper <= lower || upper - lower < 2 {
            return Err(empty(lower, upper));
        }
        Ok(lower + 1 + self.less_than_u64(upper - lower - 1)?)
    }

    // Signed ranges: the span always fits the unsigned type of the same width,
    // so the offset is drawn unsigned and added back with wrapping arithmetic.

    fn half_open_i32(&mut self, lower: i32, upper: i32) -> Result<i32, RangeError> {
        if lower >= upper {
            return Err(empty(lower, upper));
        }
        let span = upper.wrapping_sub(lower) as u32;
        Ok(lower.wrapping_add(self.less_than_u32(span)? as i32))
    }

    fn closed_i32(&mut self, lower: i32, upper: i32) -> Result<i32, RangeError> {
        if lower > upper {
            return Err(empty(lower, upper));
        }
        let span = upper.wrapping_sub(lower) as u32;
        Ok(lower.wrapping_add(self.less_than_or_equal_u32(span) as i32))
    }

    fn open_i32(&mut self, lower: i32, upper: i32) -> Result<i32, RangeError> {
        if (upper as i64) - (lower as i64) < 2 {
            return Err(empty(lower, upper));
        }
        let span = upper.wrapping_sub(lower) as u32 - 1;
        Ok(lower.wrapping_add(1).wrapping_add(self.less_than_u32(span)? as i32))
    }

    fn half_open_i64(&mut self, lower: i64, upper: i64) -> Result<i64, RangeError> {
        if lower >= upper {
            return Err(empty(lower, upper));
        }
        let span = upper.wrapping_sub(lower) as u64;
        Ok(lower.wrapping_add(self.less_than_u64(span)? as i64))
    }

    fn closed_i64(&mut self, lower: i64, upper: i64) -> Result<i64, RangeError> {
        if lower > upper {
            return Err(empty(lower, upper));
        }
        let span = upper.wrapping_sub(lower) as u64;
        Ok(lower.wrapping_add(self.less_than_or_equal_u64(span) as i64))
    }

    fn open_i64(&mut self, lower: i64, upper: i64) -> Result<i64, RangeError> {
        if (upper as i128) - (lower as i128) < 2 {
            return Err(empty(lower, upper));
        }
        let span = upper.wrapping_sub(lower) as u64 - 1;
        Ok(lower.wrapping_add(1).wrapping_add(self.less_than_u64(span)? as i64))
    }
}

impl<T: BitSource + ?Sized> RangeExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::mix64::Mix64;

    /// Replays a fixed list of 64-bit words
    struct Replay(Vec<u64>);

    impl BitSource for Replay {
        fn next32(&mut self) -> u32 {
            self.next64() as u32
        }

        fn next64(&mut self) -> u64 {
            self.0.remove(0)
        }
    }

    #[test]
    fn test_less_than_zero_is_empty() {
        let mut rng = Mix64::from_state(1);
        assert_eq!(
            rng.less_than_u32(0),
            Err(RangeError::EmptyRange { lower: 0, upper: 0 })
        );
        assert!(rng.less_than_u64(0).is_err());
    }

    #[test]
    fn test_less_than_one_is_always_zero() {
        let mut rng = Mix64::from_state(1);
        for _ in 0..100 {
            assert_eq!(rng.less_than_u32(1), Ok(0));
            assert_eq!(rng.less_than_u64(1), Ok(0));
        }
    }

    #[test]
    fn test_rejection_redraws_out_of_range_values() {
        // Bound 5 masks to 3 bits: 7 and 5 are rejected, 4 accepted
        let mut source = Replay(vec![0xFF, 0x05, 0x04]);
        assert_eq!(source.less_than_u32(5), Ok(4));
        assert!(source.0.is_empty());
    }

    #[test]
    fn test_inclusive_bound_is_reachable_at_power_of_two_minus_one() {
        // upper = 7 uses exactly 3 bits, so nothing is ever rejected
        let mut source = Replay(vec![0x0F, 0x08]);
        assert_eq!(source.less_than_or_equal_u32(7), 7);
        assert_eq!(source.less_than_or_equal_u32(7), 0);
    }

    #[test]
    fn test_inclusive_bound_rejects_only_above_bound() {
        // upper = 8 needs 4 bits; 9 is rejected, 8 accepted
        let mut source = Replay(vec![0x09, 0x08]);
        assert_eq!(source.less_than_or_equal_u64(8), 8);
    }

    #[test]
    fn test_full_width_ranges() {
        let mut rng = Mix64::from_state(5);
        let mut reference = rng.clone();
        assert_eq!(rng.less_than_or_equal_u64(u64::MAX), reference.next64());
        assert_eq!(
            rng.closed_i64(i64::MIN, i64::MAX),
            Ok(reference.next64() as i64 ^ i64::MIN)
        );
        rng.closed_u32(0, u32::MAX).unwrap();
    }

    #[test]
    fn test_empty_interval_errors() {
        let mut rng = Mix64::from_state(9);
        assert!(rng.half_open_u32(4, 4).is_err());
        assert!(rng.closed_u64(5, 4).is_err());
        assert!(rng.open_u32(4, 5).is_err());
        assert!(rng.open_i64(-1, 0).is_err());
        assert_eq!(
            rng.half_open_i32(3, -3),
            Err(RangeError::EmptyRange { lower: 3, upper: -3 })
        );
    }

    #[test]
    fn test_single_value_intervals() {
        let mut rng = Mix64::from_state(9);
        assert_eq!(rng.closed_u32(17, 17), Ok(17));
        assert_eq!(rng.half_open_i64(-4, -3), Ok(-4));
        assert_eq!(rng.open_i32(-4, -2), Ok(-3));
        assert_eq!(rng.open_u64(10, 12), Ok(11));
    }
}
