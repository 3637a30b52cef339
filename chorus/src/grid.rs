//! The grid access interface consumed by the plant logic.

use glam::IVec3;

use crate::segment::Segment;


/// Kind of feedback triggered by plant growth, the grid decides what to do with them,
/// typically playing a sound or spawning particles for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// A new bud has been placed.
    Grow,
    /// A bud reached its maximum maturity.
    Mature,
}

impl Feedback {

    /// Get the Notchian auxiliary effect id of this feedback.
    #[inline]
    pub fn effect_id(self) -> u16 {
        match self {
            Feedback::Grow => 1033,
            Feedback::Mature => 1034,
        }
    }

}


/// Read and write access to a 3D grid of segments. The plant logic never caches any
/// grid state between calls, every decision is taken from the values returned here.
pub trait Grid {

    /// Get the segment at the given position.
    fn get_cell(&self, pos: IVec3) -> Segment;

    /// Overwrite the segment at the given position, setting the same segment twice has
    /// no additional effect.
    fn set_cell(&mut self, pos: IVec3, segment: Segment);

    /// Remove the segment at the given position, and anything that it was structurally
    /// supporting, depending on the grid's semantics.
    fn destroy_cell(&mut self, pos: IVec3);

    /// Fire a feedback event at the given position.
    fn trigger_feedback(&mut self, pos: IVec3, feedback: Feedback);

    /// The maximum vertical coordinate, excluded, where cells can be placed.
    fn ceiling_height(&self) -> i32;

    /// Return true if there is nothing at the given position.
    #[inline]
    fn is_empty(&self, pos: IVec3) -> bool {
        self.get_cell(pos).is_empty()
    }

}
