//! Segment ticking functions.

use glam::IVec3;

use crate::plant;
use crate::segment;

use super::World;


impl World {

    /// Tick a segment in the world. Random ticks and scheduled ticks currently run the
    /// same logic.
    pub(super) fn tick_segment_unchecked(&mut self, pos: IVec3, id: u8, _metadata: u8, _random: bool) {
        match id {
            segment::BUD => self.tick_bud(pos),
            segment::STEM => {}, // Stems only react to notifications.
            segment::SUBSTRATE => {},
            _ => {}
        }
    }

    /// Tick a bud, advance its growth.
    fn tick_bud(&mut self, pos: IVec3) {
        // The random generator is temporarily moved out because the world is borrowed
        // as the grid.
        let mut rand = self.rand.clone();
        plant::advance(self, pos, &mut rand);
        self.rand = rand;
    }

}


#[cfg(test)]
mod tests {

    use crate::segment::{Segment, MAX_MATURITY};
    use super::*;

    #[test]
    fn random_ticks_grow_plant() {

        let mut world = World::with_seed(12345);
        let root = IVec3::new(8, 64, 8);
        world.fill_segments(IVec3::new(0, 60, 0), IVec3::new(16, 64, 16), Segment::Substrate);
        assert!(world.place_bud(root));

        // Each segment of the chunk is randomly ticked about once every 32 ticks.
        world.set_random_ticks(2048);
        for _ in 0..5000 {
            world.tick();
        }

        let segments = world.iter_segments_in(IVec3::new(0, 64, 0), IVec3::new(16, 256, 16))
            .filter(|(_, segment)| segment.is_plant())
            .collect::<Vec<_>>();

        assert!(segments.len() > 1);
        assert_eq!(world.get_segment(root), Segment::Stem);
        assert!(segments.iter().any(|&(_, segment)| segment == Segment::bud(MAX_MATURITY)));
        assert!(segments.iter().all(|&(pos, _)| world.is_rooted(pos)));

    }

}
