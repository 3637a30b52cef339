//! Segment notification methods for world.

use glam::IVec3;

use tracing::trace;

use crate::segment::{self, Segment};
use crate::plant::can_support;
use crate::util::Face;

use super::{World, Event, SegmentEvent};


impl World {

    /// Notify all segments around the position that something changed.
    pub fn notify_around(&mut self, pos: IVec3) {
        for face in Face::ALL {
            self.notify_segment(pos + face.delta());
        }
    }

    /// Notify a segment at the position that one of its neighbors changed.
    pub fn notify_segment(&mut self, pos: IVec3) {
        match self.get_segment(pos) {
            Segment::Bud { .. } => self.notify_bud(pos),
            Segment::Stem => {
                self.notify_plant(pos);
            }
            _ => {}
        }
    }

    /// Notification of a bud.
    fn notify_bud(&mut self, pos: IVec3) {
        // PARITY: Notchian server schedules an update instead of breaking the flower
        // immediately, it then breaks on its tick if still not supported.
        if self.notify_plant(pos) && !can_support(&*self, pos) {
            self.schedule_tick(pos, segment::BUD, 1);
        }
    }

    /// Notification of a plant segment, the whole plant is destroyed if it no longer
    /// stands on any substrate, its neighbors are then notified in turn. Returns true
    /// if the plant is still there.
    fn notify_plant(&mut self, pos: IVec3) -> bool {

        let Some(plant) = self.find_plant(pos) else { return false };
        if plant.rooted {
            return true;
        }

        trace!("plant of {} segments at {pos} is no longer rooted", plant.cells.len());

        for &pos in &plant.cells {
            let prev = self.set_segment(pos, Segment::Empty);
            self.push_event(Event::Segment { pos, inner: SegmentEvent::Destroy { prev } });
        }

        // Segments of other plants may have rested on this one.
        for &pos in &plant.cells {
            self.notify_around(pos);
        }

        false

    }

}
