//! Various math and random utilities.

mod rand;
mod face;

pub use rand::{JavaRandom, GrowthRand};
pub use face::Face;
