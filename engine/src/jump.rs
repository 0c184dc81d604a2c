//! Polynomial jump-ahead
//!
//! The xorshift-family transitions use only xor, fixed shifts and fixed
//! rotations, so each is a linear map `T` over GF(2). Advancing `2^M` steps is
//! `T^(2^M)`, which equals a fixed polynomial in `T`. With that polynomial
//! precomputed as a bit constant, the jump costs one elementary step per bit
//! of state instead of `2^M` steps.
//!
//! Any polynomial in `T` commutes with `T` itself, so interleaving draws and
//! jumps in any order yields the same state for the same total step count.

/// A generator whose elementary step is linear over GF(2)
pub(crate) trait LinearState<const N: usize> {
    /// State words in logical order (ring generators start at their offset)
    fn words(&self) -> [u64; N];

    /// Overwrite the state words, in the same logical order as [`words`](Self::words)
    fn replace_words(&mut self, words: [u64; N]);

    /// Apply the transition once, discarding output
    fn step(&mut self);
}

/// Replace the generator's state with `p(T)` applied to it
///
/// Bit `b` of `polynomial[i]` is the coefficient of `T^(64 i + b)`.
pub(crate) fn apply<S, const N: usize>(state: &mut S, polynomial: &[u64; N])
where
    S: LinearState<N>,
{
    let mut accumulator = [0u64; N];

    for &coefficients in polynomial {
        for bit in 0..64 {
            if coefficients & (1u64 << bit) != 0 {
                for (acc, word) in accumulator.iter_mut().zip(state.words()) {
                    *acc ^= word;
                }
            }
            state.step();
        }
    }

    state.replace_words(accumulator);
}
