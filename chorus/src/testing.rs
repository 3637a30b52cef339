//! Grid wrappers shared by the tests of the growth algorithms.

use glam::IVec3;

use crate::grid::{Grid, Feedback};
use crate::segment::Segment;
use crate::world::World;
use crate::util::Face;


/// A grid checking structural rules at the moment new segments are placed in empty
/// cells: nothing lands directly above a bud, and the new segment touches at most one
/// horizontal neighbor, its parent. Overwriting an existing segment, like a bud turning
/// into a stem, is not checked.
pub struct CheckedGrid {
    pub world: World,
    /// Every position written, in order.
    pub placed: Vec<IVec3>,
    /// Number of segments placed in empty cells.
    pub grown: usize,
}

impl CheckedGrid {

    pub fn new(world: World) -> Self {
        Self { world, placed: Vec::new(), grown: 0 }
    }

}

impl Grid for CheckedGrid {

    fn get_cell(&self, pos: IVec3) -> Segment {
        self.world.get_segment(pos)
    }

    fn set_cell(&mut self, pos: IVec3, segment: Segment) {

        if self.world.get_segment(pos).is_empty() && !segment.is_empty() {

            assert!(!self.world.get_segment(pos - IVec3::Y).is_bud(), "{segment:?} placed above a bud at {pos}");

            let occupied = Face::HORIZONTAL.into_iter()
                .filter(|face| !self.world.get_segment(pos + face.delta()).is_empty())
                .count();
            assert!(occupied <= 1, "{segment:?} placed at {pos} with {occupied} neighbors");

            self.grown += 1;

        }

        self.world.set_segment(pos, segment);
        self.placed.push(pos);

    }

    fn destroy_cell(&mut self, pos: IVec3) {
        self.world.destroy_segment(pos);
    }

    fn trigger_feedback(&mut self, _pos: IVec3, _feedback: Feedback) {}

    fn ceiling_height(&self) -> i32 {
        self.world.ceiling_height()
    }

}
