//! Structural rules shared by the eager generator and the tick simulation of chorus
//! plants.
//!
//! A plant is made of [`Segment::Stem`] cells, rooted on [`Segment::Substrate`] or on
//! another stem, and capped by [`Segment::Bud`] cells. Two rules decide where cells can
//! go: the isolation rule, which prevents stems from fusing into solid walls, and the
//! support rule, which only looks at the cell directly beneath a position.

use glam::IVec3;

use crate::segment::Segment;
use crate::util::Face;
use crate::grid::Grid;

mod grow;
pub use grow::advance;


/// Return true if all horizontal neighbors of the position are empty, except the one
/// in the excluded direction, which is usually the direction a branch grows from.
pub fn is_isolated(grid: &impl Grid, pos: IVec3, excluded: Option<Face>) -> bool {
    Face::HORIZONTAL.into_iter()
        .filter(|&face| Some(face) != excluded)
        .all(|face| grid.is_empty(pos + face.delta()))
}

/// Return true if the cell beneath the given position can hold a plant segment at this
/// position. Substrate and stems always support, an empty cell only supports when the
/// position is laterally attached to exactly one stem and nothing else.
pub fn can_support(grid: &impl Grid, pos: IVec3) -> bool {
    match grid.get_cell(pos - IVec3::Y) {
        Segment::Substrate | Segment::Stem => true,
        Segment::Empty => {
            let mut stems = 0;
            for face in Face::HORIZONTAL {
                match grid.get_cell(pos + face.delta()) {
                    Segment::Stem => stems += 1,
                    Segment::Empty => {}
                    _ => return false,
                }
            }
            stems == 1
        }
        _ => false,
    }
}

/// Return true if a lateral branch can grow from `from` toward the given horizontal
/// face: the target and the cell beneath it must be empty, and the target must be
/// isolated apart from the side it grows from.
pub fn can_branch(grid: &impl Grid, from: IVec3, face: Face) -> bool {
    debug_assert!(face.is_horizontal());
    let target = from + face.delta();
    grid.is_empty(target) &&
    grid.is_empty(target - IVec3::Y) &&
    is_isolated(grid, target, Some(face.opposite()))
}


#[cfg(test)]
mod tests {

    use crate::world::World;
    use super::*;

    #[test]
    fn isolation_ignores_excluded_face() {

        let mut world = World::new();
        let pos = IVec3::new(0, 64, 0);
        assert!(is_isolated(&world, pos, None));

        world.set_cell(pos + IVec3::X, Segment::Stem);
        assert!(!is_isolated(&world, pos, None));
        assert!(is_isolated(&world, pos, Some(Face::PosX)));
        assert!(!is_isolated(&world, pos, Some(Face::NegX)));

        // Vertical neighbors are never checked.
        world.set_cell(pos + IVec3::X, Segment::Empty);
        world.set_cell(pos + IVec3::Y, Segment::Substrate);
        world.set_cell(pos - IVec3::Y, Segment::Substrate);
        assert!(is_isolated(&world, pos, None));

    }

    #[test]
    fn support_beneath() {

        let mut world = World::new();
        let pos = IVec3::new(3, 10, -7);

        // Nothing around.
        assert!(!can_support(&world, pos));

        world.set_cell(pos - IVec3::Y, Segment::Substrate);
        assert!(can_support(&world, pos));
        world.set_cell(pos - IVec3::Y, Segment::Stem);
        assert!(can_support(&world, pos));
        world.set_cell(pos - IVec3::Y, Segment::bud(2));
        assert!(!can_support(&world, pos));

    }

    #[test]
    fn support_lateral() {

        let mut world = World::new();
        let pos = IVec3::new(0, 10, 0);

        world.set_cell(pos + IVec3::Z, Segment::Stem);
        assert!(can_support(&world, pos));

        // Two stems is not a lone attachment point.
        world.set_cell(pos - IVec3::Z, Segment::Stem);
        assert!(!can_support(&world, pos));

        // Any other neighbor breaks the support.
        world.set_cell(pos - IVec3::Z, Segment::bud(0));
        assert!(!can_support(&world, pos));
        world.set_cell(pos - IVec3::Z, Segment::Substrate);
        assert!(!can_support(&world, pos));

    }

    #[test]
    fn branch_rejects_neighboring_stem() {

        let mut world = World::new();
        let parent = IVec3::new(0, 20, 0);
        world.set_cell(parent, Segment::Stem);
        assert!(can_branch(&world, parent, Face::PosX));

        // Another stem next to the target, which is not the parent.
        world.set_cell(parent + IVec3::X + IVec3::Z, Segment::Stem);
        assert!(!can_branch(&world, parent, Face::PosX));

        // Target must have an empty cell beneath.
        assert!(can_branch(&world, parent, Face::NegX));
        world.set_cell(parent - IVec3::X - IVec3::Y, Segment::Substrate);
        assert!(!can_branch(&world, parent, Face::NegX));

    }

}
