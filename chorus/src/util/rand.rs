//! Pseudo-random number generation used by plant growth.

use std::time::{UNIX_EPOCH, SystemTime};
use std::num::Wrapping;

use super::Face;


const MULTIPLIER: Wrapping<i64> = Wrapping(0x5DEECE66D);
const ADDEND: Wrapping<i64> = Wrapping(0xB);
const MASK: Wrapping<i64> = Wrapping((1 << 48) - 1);


#[inline]
fn initial_scramble(seed: i64) -> Wrapping<i64> {
    (Wrapping(seed) ^ MULTIPLIER) & MASK
}


/// The random source consumed by the growth algorithms. Only bounded integers and
/// horizontal faces are ever drawn, implementors are free to be deterministic.
pub trait GrowthRand {

    /// Return a pseudo-random integer in `0..bound`, the bound must be positive.
    fn next_int_bounded(&mut self, bound: i32) -> i32;

    /// Return one of the four horizontal faces, uniformly.
    #[inline]
    fn next_horizontal(&mut self) -> Face {
        Face::HORIZONTAL_PLANE[self.next_int_bounded(4) as usize]
    }

}


/// A random number generator with the same constants and outputs as `java.util.Random`.
#[derive(Debug, Clone)]
pub struct JavaRandom {
    seed: Wrapping<i64>
}

impl JavaRandom {

    #[inline]
    pub fn new(seed: i64) -> JavaRandom {
        JavaRandom { seed: initial_scramble(seed) }
    }

    /// Create a new random generator seeded from the current system time.
    pub fn new_seeded() -> JavaRandom {
        // Nano time as an integer value is not available in Rust, even with Instant, so
        // we use the duration since unix epoch of the system time.
        let seed = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => 8682522807148012 ^ (d.as_nanos() as i64),
            Err(_) => 8682522807148012,
        };
        Self::new(seed)
    }

    #[inline]
    fn next(&mut self, bits: u8) -> i32 {
        self.seed = (self.seed * MULTIPLIER + ADDEND) & MASK;
        (self.seed.0 as u64 >> (48 - bits)) as i32
    }

    #[inline]
    pub fn next_int(&mut self) -> i32 {
        self.next(32)
    }

    /// Get the next pseudo-random integer in `0..bound`. Panics if the bound is not
    /// strictly positive.
    pub fn next_int_bounded(&mut self, bound: i32) -> i32 {

        assert!(bound > 0, "bound must be positive, got {bound}");

        if (bound & -bound) == bound {
            (((bound as i64).wrapping_mul(self.next(31) as i64)) >> 31) as i32
        } else {

            let mut bits;
            let mut val;

            loop {
                bits = self.next(31);
                val = bits.rem_euclid(bound);
                if bits.wrapping_sub(val).wrapping_add(bound - 1) >= 0 {
                    break;
                }
            }

            val

        }

    }

}

impl GrowthRand for JavaRandom {

    #[inline]
    fn next_int_bounded(&mut self, bound: i32) -> i32 {
        JavaRandom::next_int_bounded(self, bound)
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn java_parity() {
        // Values produced by `new java.util.Random(0)`.
        let mut rand = JavaRandom::new(0);
        assert_eq!(rand.next_int(), -1155484576);
        assert_eq!(rand.next_int(), -723955400);
        let mut rand = JavaRandom::new(0);
        assert_eq!(rand.next_int_bounded(10), 0);
        assert_eq!(rand.next_int_bounded(10), 8);
    }

    #[test]
    fn bound_one_is_always_zero() {
        let mut rand = JavaRandom::new(42);
        for _ in 0..64 {
            assert_eq!(rand.next_int_bounded(1), 0);
        }
    }

    #[test]
    fn horizontal_faces_only() {
        let mut rand = JavaRandom::new(1234);
        for _ in 0..64 {
            assert!(rand.next_horizontal().is_horizontal());
        }
    }

}
