//! Feature generation module.

use glam::IVec3;

use crate::util::GrowthRand;
use crate::grid::Grid;

mod chorus;
pub use chorus::{ChorusGenerator, GrowthStats, MAX_BRANCH_DEPTH};


/// A trait for all feature generators, features are generated in one pass from a
/// position in a grid.
pub trait FeatureGenerator {

    /// Generate the feature at the given position in the grid with given RNG, returns
    /// true if the feature has been generated.
    fn generate(&mut self, grid: &mut impl Grid, pos: IVec3, rand: &mut impl GrowthRand) -> bool;

}
