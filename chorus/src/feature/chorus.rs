//! Eager generation of whole chorus plants.

use glam::IVec3;

use tracing::debug;

use crate::plant::{can_support, can_branch, is_isolated};
use crate::segment::Segment;
use crate::util::GrowthRand;
use crate::grid::Grid;

use super::FeatureGenerator;


/// Branches at this depth don't spread further, the trunk has depth 0.
pub const MAX_BRANCH_DEPTH: u8 = 4;


/// A feature generator for fully grown chorus plants, all buds of generated plants are
/// mature.
#[derive(Debug, Clone)]
pub struct ChorusGenerator {
    /// Branches are not spreading to positions that are this distance or further from
    /// the plant's origin, on the X or Z axis.
    radius: i32,
}

/// Statistics about a generated plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrowthStats {
    /// Number of stems in the plant.
    pub stems: u32,
    /// Number of buds in the plant.
    pub buds: u32,
    /// The deepest branch level reached, the trunk has depth 0.
    pub max_depth: u8,
}

impl ChorusGenerator {

    #[inline]
    pub fn new(radius: i32) -> Self {
        Self { radius }
    }

    /// Grow a whole plant from the given seed position. Nothing is generated and none is
    /// returned if the seed position cannot be supported.
    pub fn grow(&self, grid: &mut impl Grid, pos: IVec3, rand: &mut impl GrowthRand) -> Option<GrowthStats> {

        if !can_support(grid, pos) || pos.y >= grid.ceiling_height() {
            return None;
        }

        let mut stats = GrowthStats::default();
        grid.set_cell(pos, Segment::Stem);
        stats.stems += 1;

        self.grow_branch(grid, pos, rand, pos, 0, &mut stats);

        debug!("grown chorus plant at {pos}: {} stems, {} buds, depth {}",
            stats.stems, stats.buds, stats.max_depth);

        Some(stats)

    }

    /// Grow a branch upward from the given stem position, and then spread further
    /// branches from its top.
    fn grow_branch(&self,
        grid: &mut impl Grid,
        pos: IVec3,
        rand: &mut impl GrowthRand,
        origin: IVec3,
        depth: u8,
        stats: &mut GrowthStats,
    ) {

        stats.max_depth = stats.max_depth.max(depth);

        let mut height = rand.next_int_bounded(4) + 1;
        if depth == 0 {
            height += 1;
        }

        for dy in 1..=height {
            let stem_pos = pos + IVec3::new(0, dy, 0);
            // The branch is abandoned as-is if a stem would touch anything.
            if stem_pos.y >= grid.ceiling_height() || !is_isolated(grid, stem_pos, None) {
                return;
            }
            grid.set_cell(stem_pos, Segment::Stem);
            stats.stems += 1;
        }

        let top_pos = pos + IVec3::new(0, height, 0);
        let mut branched = false;

        if depth < MAX_BRANCH_DEPTH {

            let mut count = rand.next_int_bounded(4);
            if depth == 0 {
                count += 1;
            }

            for _ in 0..count {

                let face = rand.next_horizontal();
                let branch_pos = top_pos + face.delta();

                if (branch_pos.x - origin.x).abs() < self.radius
                && (branch_pos.z - origin.z).abs() < self.radius
                && can_branch(grid, top_pos, face) {
                    branched = true;
                    grid.set_cell(branch_pos, Segment::Stem);
                    stats.stems += 1;
                    self.grow_branch(grid, branch_pos, rand, origin, depth + 1, stats);
                }

            }

        }

        if !branched {
            grid.set_cell(top_pos, Segment::mature_bud());
            stats.stems -= 1;
            stats.buds += 1;
        }

    }

}

impl FeatureGenerator for ChorusGenerator {

    fn generate(&mut self, grid: &mut impl Grid, pos: IVec3, rand: &mut impl GrowthRand) -> bool {
        self.grow(grid, pos, rand).is_some()
    }

}


#[cfg(test)]
mod tests {

    use std::collections::HashSet;

    use proptest::prelude::*;

    use crate::testing::CheckedGrid;
    use crate::world::World;
    use crate::util::{JavaRandom, Face};
    use super::*;

    /// A random source that always returns the greatest value allowed by the bound.
    struct MaxRand;

    impl GrowthRand for MaxRand {
        fn next_int_bounded(&mut self, bound: i32) -> i32 {
            bound - 1
        }
    }

    fn checked_grid() -> (CheckedGrid, IVec3) {
        let mut world = World::with_seed(0);
        world.fill_segments(IVec3::new(-32, 60, -32), IVec3::new(32, 64, 32), Segment::Substrate);
        (CheckedGrid::new(world), IVec3::new(0, 64, 0))
    }

    /// Collect all plant segments connected to the seed.
    fn reachable(world: &World, seed: IVec3) -> HashSet<IVec3> {
        let mut cells = HashSet::from([seed]);
        let mut pending = vec![seed];
        while let Some(pos) = pending.pop() {
            for face in Face::ALL {
                let face_pos = pos + face.delta();
                if world.get_segment(face_pos).is_plant() && cells.insert(face_pos) {
                    pending.push(face_pos);
                }
            }
        }
        cells
    }

    #[test]
    fn grow_on_substrate() {

        let (mut grid, seed) = checked_grid();
        let stats = ChorusGenerator::new(16).grow(&mut grid, seed, &mut JavaRandom::new(0)).unwrap();

        assert!(stats.stems >= 1);
        assert!(stats.buds >= 1);
        assert_eq!(grid.world.get_segment(seed), Segment::Stem);

        let cells = reachable(&grid.world, seed);
        let stems = cells.iter().filter(|&&pos| grid.world.get_segment(pos).is_stem()).count();
        let buds = cells.iter().filter(|&&pos| grid.world.get_segment(pos) == Segment::mature_bud()).count();
        assert_eq!(stems as u32, stats.stems);
        assert_eq!(buds as u32, stats.buds);

    }

    #[test]
    fn unsupported_seed_refused() {
        let mut world = World::with_seed(0);
        let seed = IVec3::new(0, 64, 0);
        let mut generator = ChorusGenerator::new(16);
        assert!(!can_support(&world, seed));
        assert!(!generator.generate(&mut world, seed, &mut JavaRandom::new(0)));
        assert_eq!(world.get_segment(seed), Segment::Empty);
    }

    #[test]
    fn adversarial_random_depth() {
        let (mut grid, seed) = checked_grid();
        let stats = ChorusGenerator::new(16).grow(&mut grid, seed, &mut MaxRand).unwrap();
        assert_eq!(stats.max_depth, MAX_BRANCH_DEPTH);
        // Every branch spreads west only, ending in a single bud.
        assert_eq!(stats.buds, 1);
        assert_eq!(grid.world.get_segment(seed + IVec3::new(-4, 21, 0)), Segment::mature_bud());
    }

    #[test]
    fn radius_one_is_a_single_stalk() {
        let (mut grid, seed) = checked_grid();
        let stats = ChorusGenerator::new(1).grow(&mut grid, seed, &mut MaxRand).unwrap();
        assert_eq!(stats, GrowthStats { stems: 5, buds: 1, max_depth: 0 });
        assert_eq!(grid.world.get_segment(seed + IVec3::new(0, 5, 0)), Segment::mature_bud());
    }

    #[test]
    fn blocked_stalk_is_truncated() {
        let (mut grid, seed) = checked_grid();
        // Something next to the third stem of the trunk.
        grid.world.set_segment(seed + IVec3::new(1, 3, 0), Segment::Substrate);
        let stats = ChorusGenerator::new(16).grow(&mut grid, seed, &mut MaxRand).unwrap();
        assert_eq!(stats, GrowthStats { stems: 3, buds: 0, max_depth: 0 });
        assert_eq!(grid.world.get_segment(seed + IVec3::new(0, 2, 0)), Segment::Stem);
        assert_eq!(grid.world.get_segment(seed + IVec3::new(0, 3, 0)), Segment::Empty);
    }

    proptest! {

        #[test]
        fn generated_plant_bounds(seed in any::<i64>(), radius in 1i32..12) {

            let (mut grid, origin) = checked_grid();
            let stats = ChorusGenerator::new(radius).grow(&mut grid, origin, &mut JavaRandom::new(seed)).unwrap();

            prop_assert!(stats.max_depth <= MAX_BRANCH_DEPTH);

            for &pos in &grid.placed {
                prop_assert!((pos.x - origin.x).abs() < radius);
                prop_assert!((pos.z - origin.z).abs() < radius);
            }

        }

    }

}
