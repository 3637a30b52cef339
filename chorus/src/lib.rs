//! Chorus plant growth on a voxel grid, with eager generation of whole plants and a
//! tick-driven simulation of growing buds.

pub mod util;

pub mod segment;
pub mod grid;
pub mod plant;
pub mod feature;

pub mod chunk;
pub mod world;

#[cfg(test)]
mod testing;
