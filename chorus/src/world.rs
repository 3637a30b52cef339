//! Data structure for storing a world of segments at runtime.

use std::collections::{HashMap, BTreeSet, HashSet};
use std::iter::FusedIterator;
use std::cmp::Ordering;
use std::cell::Cell;
use std::mem;

use glam::IVec3;

use tracing::{trace, instrument};

use crate::chunk::{Chunk, calc_chunk_pos, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::feature::{ChorusGenerator, GrowthStats};
use crate::grid::{Grid, Feedback};
use crate::plant;
use crate::segment::{self, Segment};
use crate::util::{JavaRandom, Face};


// Following modules are order by order of importance, last modules depends on first ones.
pub mod notify;
pub mod tick;


/// Default number of random ticks per chunk and per world tick.
pub const DEFAULT_RANDOM_TICKS: u32 = 80;


// Thread local vector used to avoid frequent reallocation of temporary vector.
thread_local! {
    /// This thread local vector is used temporally to stores the random ticks to be
    /// executed. This is mandatory since ticking a segment requires full mutable access
    /// to the world, but it's not possible while owning a reference to a chunk.
    static RANDOM_TICKS_PENDING: Cell<Vec<(IVec3, u8, u8)>> = const { Cell::new(Vec::new()) };
}


/// # Components
///
/// This data structure stores chunks, each chunk stores the segment id and metadata of
/// a 16x16 column of the world with a height of 256. Chunks are created the first time
/// a segment is set inside them, reading a missing chunk gives empty segments.
///
/// # Logic
///
/// The world runs the plant logic on each tick: scheduled ticks first, then random
/// ticks in every loaded chunk. Ticking a bud advances its growth.
///
/// # Events
///
/// This structure also allows listening for events within it through a queue of
/// [`Event`], events listening is disabled by default but can be enabled by swapping
/// a `Vec<Event>` into the world using the [`World::swap_events`].
///
/// # Naming convention
///
/// - Methods that don't alter the world and return values are prefixed by `get_`;
/// - Getter methods that return booleans prefer `can_`, `has_` or `is_` prefixes;
/// - Methods that alter the world by running a logic tick start with `tick_`;
/// - Methods that iterate over some world objects start with `iter_`.
#[derive(Clone)]
pub struct World {
    /// When enabled, this contains the list of events that happened in the world since
    /// it was last swapped.
    events: Option<Vec<Event>>,
    /// The world time, increasing on each tick. This is used for registering scheduled
    /// ticks.
    time: u64,
    /// The world's global random number generator, used for plant growth.
    rand: JavaRandom,
    /// The mapping of world chunks.
    chunks: HashMap<(i32, i32), Box<Chunk>>,
    /// Total scheduled ticks count since the world is running.
    scheduled_ticks_count: u64,
    /// Mapping of scheduled ticks in the future.
    scheduled_ticks: BTreeSet<ScheduledTick>,
    /// A set of all scheduled tick states, used to avoid ticking twice the same position
    /// and segment id.
    scheduled_ticks_states: HashSet<ScheduledTickState>,
    /// This is the wrapping seed used by random ticks to compute random positions.
    random_ticks_seed: i32,
    /// Number of random ticks per chunk and per world tick.
    random_ticks: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {

    /// Create a new empty world with a random generator seeded from current time, events
    /// are disabled by default.
    pub fn new() -> Self {
        Self::with_rand(JavaRandom::new_seeded())
    }

    /// Create a new empty world with the given seed for all its random logic.
    pub fn with_seed(seed: i64) -> Self {
        Self::with_rand(JavaRandom::new(seed))
    }

    fn with_rand(mut rand: JavaRandom) -> Self {
        let random_ticks_seed = rand.next_int();
        Self {
            events: None,
            time: 0,
            rand,
            chunks: HashMap::new(),
            scheduled_ticks_count: 0,
            scheduled_ticks: BTreeSet::new(),
            scheduled_ticks_states: HashSet::new(),
            random_ticks_seed,
            random_ticks: DEFAULT_RANDOM_TICKS,
        }
    }

    /// This function can be used to swap in a new events queue and return the previous
    /// one if relevant. Giving *None* events queue disable events registration using
    /// the [`push_event`](Self::push_event) method.
    pub fn swap_events(&mut self, events: Option<Vec<Event>>) -> Option<Vec<Event>> {
        mem::replace(&mut self.events, events)
    }

    /// Push an event in this world. This only actually push the event if events are
    /// enabled.
    #[inline]
    pub fn push_event(&mut self, event: Event) {
        if let Some(events) = &mut self.events {
            events.push(event);
        }
    }

    /// Get the world time, in ticks.
    pub fn get_time(&self) -> u64 {
        self.time
    }

    /// Set the number of random ticks run in each chunk on each world tick.
    pub fn set_random_ticks(&mut self, random_ticks: u32) {
        self.random_ticks = random_ticks;
    }

    // =================== //
    //        CHUNKS       //
    // =================== //

    /// Return the number of chunks in this world.
    pub fn get_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    // =================== //
    //       SEGMENTS      //
    // =================== //

    /// Get the segment at the given position, positions outside of the world height or
    /// in missing chunks are empty.
    pub fn get_segment(&self, pos: IVec3) -> Segment {
        let Some((cx, cz)) = calc_chunk_pos(pos) else { return Segment::Empty };
        let Some(chunk) = self.chunks.get(&(cx, cz)) else { return Segment::Empty };
        let (id, metadata) = chunk.get(pos);
        // Chunks are only written from valid segments.
        Segment::from_raw(id, metadata).unwrap_or_default()
    }

    /// Set the segment at the given position and return the previous one, the chunk is
    /// created if not existing. This push a set event if the segment changed.
    ///
    /// Panics if the position is outside of the world height.
    pub fn set_segment(&mut self, pos: IVec3, segment: Segment) -> Segment {

        let (cx, cz) = calc_chunk_pos(pos)
            .unwrap_or_else(|| panic!("position {pos} is outside of the world height"));

        let chunk = self.chunks.entry((cx, cz)).or_insert_with(Chunk::new);
        let (prev_id, prev_metadata) = chunk.get(pos);
        let (id, metadata) = segment.to_raw();

        if prev_id != id || prev_metadata != metadata {
            chunk.set(pos, id, metadata);
            let prev = Segment::from_raw(prev_id, prev_metadata).unwrap_or_default();
            self.push_event(Event::Segment { pos, inner: SegmentEvent::Set { segment, prev } });
            prev
        } else {
            segment
        }

    }

    /// Same as the [`set_segment`](Self::set_segment) method, but the segments around
    /// are notified of that change.
    pub fn set_segment_notify(&mut self, pos: IVec3, segment: Segment) -> Segment {
        let prev = self.set_segment(pos, segment);
        if prev != segment {
            self.notify_around(pos);
        }
        prev
    }

    /// Fill the given area, max excluded, with the given segment. No event is pushed
    /// and no segment is notified, this is intended for building the initial terrain.
    pub fn fill_segments(&mut self, min: IVec3, max: IVec3, segment: Segment) {

        let min = min.max(IVec3::new(i32::MIN, 0, i32::MIN));
        let max = max.min(IVec3::new(i32::MAX, CHUNK_HEIGHT as i32, i32::MAX));
        if min.cmpge(max).any() {
            return;
        }

        let (id, metadata) = segment.to_raw();
        let (min_cx, min_cz) = (min.x >> 4, min.z >> 4);
        let (max_cx, max_cz) = ((max.x - 1) >> 4, (max.z - 1) >> 4);

        for cx in min_cx..=max_cx {
            for cz in min_cz..=max_cz {

                let chunk_min = IVec3::new(cx * CHUNK_WIDTH as i32, min.y, cz * CHUNK_WIDTH as i32);
                let chunk_max = chunk_min + IVec3::new(CHUNK_WIDTH as i32, 0, CHUNK_WIDTH as i32);
                let start = min.max(chunk_min);
                let end = max.min(IVec3::new(chunk_max.x, max.y, chunk_max.z));

                self.chunks.entry((cx, cz))
                    .or_insert_with(Chunk::new)
                    .fill(start, end - start, id, metadata);

            }
        }

    }

    /// Destroy the segment at the given position and notify the segments around, this
    /// may cascade to the rest of a plant that is no longer rooted. Returns the
    /// previous segment.
    pub fn destroy_segment(&mut self, pos: IVec3) -> Segment {
        let prev = self.set_segment(pos, Segment::Empty);
        if !prev.is_empty() {
            trace!("destroyed {prev:?} at {pos}");
            self.push_event(Event::Segment { pos, inner: SegmentEvent::Destroy { prev } });
            self.notify_around(pos);
        }
        prev
    }

    /// Place a new bud at the given position, only if this position is empty and the
    /// bud would be supported. Returns true if the bud has been placed.
    pub fn place_bud(&mut self, pos: IVec3) -> bool {
        if calc_chunk_pos(pos).is_none() || !self.is_empty(pos) || !plant::can_support(&*self, pos) {
            return false;
        }
        self.set_segment_notify(pos, Segment::bud(0));
        true
    }

    /// Grow a full chorus plant from the given seed position using the world's random
    /// generator, branches spreading no further than the given radius. Returns the
    /// statistics of the plant if the seed position was supported.
    pub fn grow_chorus(&mut self, pos: IVec3, radius: i32) -> Option<GrowthStats> {
        let mut rand = self.rand.clone();
        let stats = ChorusGenerator::new(radius).grow(self, pos, &mut rand);
        self.rand = rand;
        stats
    }

    /// Return true if the plant segment at the given position belongs to a structure
    /// that stands on substrate somewhere. Returns false if this is not a plant segment.
    pub fn is_rooted(&self, pos: IVec3) -> bool {
        self.find_plant(pos).is_some_and(|plant| plant.rooted)
    }

    /// Find all plant segments structurally connected to the given position.
    fn find_plant(&self, pos: IVec3) -> Option<PlantComponent> {

        if !self.get_segment(pos).is_plant() {
            return None;
        }

        let mut cells = HashSet::new();
        let mut pending = vec![pos];
        let mut rooted = false;
        cells.insert(pos);

        while let Some(pos) = pending.pop() {
            rooted |= self.get_segment(pos - IVec3::Y) == Segment::Substrate;
            let stem = self.get_segment(pos).is_stem();
            for face in Face::ALL {
                // Buds don't hold each other, only stems connect segments.
                let face_pos = pos + face.delta();
                let face_segment = self.get_segment(face_pos);
                if face_segment.is_plant() && (stem || face_segment.is_stem()) && cells.insert(face_pos) {
                    pending.push(face_pos);
                }
            }
        }

        Some(PlantComponent { cells, rooted })

    }

    // =================== //
    //   SCHEDULED TICKS   //
    // =================== //

    /// Schedule a tick update to happen at the given position, for the given segment id
    /// and with a given delay in ticks.
    pub fn schedule_tick(&mut self, pos: IVec3, id: u8, delay: u64) {

        let uid = self.scheduled_ticks_count;
        self.scheduled_ticks_count = self.scheduled_ticks_count.checked_add(1)
            .expect("scheduled ticks count overflow");

        let state = ScheduledTickState { pos, id };
        if self.scheduled_ticks_states.insert(state) {
            trace!("scheduled {} tick at {pos} in {delay}", segment::name(id));
            self.scheduled_ticks.insert(ScheduledTick { time: self.time + delay, state, uid });
        }

    }

    /// Return the number of ticks currently scheduled.
    pub fn get_scheduled_tick_count(&self) -> usize {
        self.scheduled_ticks.len()
    }

    // =================== //
    //      ITERATORS      //
    // =================== //

    /// Iterate over all segments in the given area where max is excluded.
    #[inline]
    pub fn iter_segments_in(&self, min: IVec3, max: IVec3) -> SegmentsInIter<'_> {
        SegmentsInIter::new(self, min, max)
    }

    // =================== //
    //        TICKING      //
    // =================== //

    /// Tick the world: advance time, run due scheduled ticks and then random ticks.
    #[instrument(skip_all)]
    pub fn tick(&mut self) {
        self.time += 1;
        self.tick_scheduled();
        self.tick_random();
    }

    /// Internal function to tick the internal scheduler.
    #[instrument(skip_all)]
    fn tick_scheduled(&mut self) {

        debug_assert_eq!(self.scheduled_ticks.len(), self.scheduled_ticks_states.len());

        while let Some(tick) = self.scheduled_ticks.first() {
            if self.time > tick.time {
                // This tick should be activated.
                let Some(tick) = self.scheduled_ticks.pop_first() else { break };
                let removed = self.scheduled_ticks_states.remove(&tick.state);
                debug_assert!(removed);
                // Check coherency of the scheduled tick and current segment.
                let (id, metadata) = self.get_segment(tick.state.pos).to_raw();
                if id == tick.state.id {
                    self.tick_segment_unchecked(tick.state.pos, id, metadata, false);
                }
            } else {
                // Our set is ordered by time first, so we break when past current time.
                break;
            }
        }

    }

    /// Internal function to run random ticks in all chunks.
    #[instrument(skip_all)]
    fn tick_random(&mut self) {

        let mut pending_random_ticks = RANDOM_TICKS_PENDING.take();
        debug_assert!(pending_random_ticks.is_empty());

        for (&(cx, cz), chunk) in &self.chunks {

            let chunk_pos = IVec3::new(cx * CHUNK_WIDTH as i32, 0, cz * CHUNK_WIDTH as i32);

            for _ in 0..self.random_ticks {

                self.random_ticks_seed = self.random_ticks_seed
                    .wrapping_mul(3)
                    .wrapping_add(1013904223);

                let rand = self.random_ticks_seed >> 2;
                let pos = IVec3::new(rand & 15, (rand >> 16) & 255, (rand >> 8) & 15);

                let (id, metadata) = chunk.get(pos);
                if id != segment::EMPTY {
                    pending_random_ticks.push((chunk_pos + pos, id, metadata));
                }

            }

        }

        for (pos, id, metadata) in pending_random_ticks.drain(..) {
            // A previous tick may have changed this segment.
            if self.get_segment(pos).to_raw() == (id, metadata) {
                self.tick_segment_unchecked(pos, id, metadata, true);
            }
        }

        RANDOM_TICKS_PENDING.set(pending_random_ticks);

    }

}

impl Grid for World {

    #[inline]
    fn get_cell(&self, pos: IVec3) -> Segment {
        self.get_segment(pos)
    }

    #[inline]
    fn set_cell(&mut self, pos: IVec3, segment: Segment) {
        self.set_segment(pos, segment);
    }

    #[inline]
    fn destroy_cell(&mut self, pos: IVec3) {
        self.destroy_segment(pos);
    }

    #[inline]
    fn trigger_feedback(&mut self, pos: IVec3, feedback: Feedback) {
        self.push_event(Event::Segment { pos, inner: SegmentEvent::Feedback { feedback } });
    }

    #[inline]
    fn ceiling_height(&self) -> i32 {
        CHUNK_HEIGHT as i32
    }

}


/// An event that happened in the world.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// An event with a segment.
    Segment {
        /// The position of the segment.
        pos: IVec3,
        /// Inner segment event.
        inner: SegmentEvent,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentEvent {
    /// A segment has been changed in the world.
    Set {
        /// The new segment.
        segment: Segment,
        /// The previous segment.
        prev: Segment,
    },
    /// A segment has been destroyed, it was previously set and is now empty.
    Destroy {
        /// The destroyed segment.
        prev: Segment,
    },
    /// A feedback effect should be played at this position.
    Feedback {
        feedback: Feedback,
    },
}


/// Plant segments connected together.
struct PlantComponent {
    /// All positions of the plant segments.
    cells: HashSet<IVec3>,
    /// True if one of the segments stands on substrate.
    rooted: bool,
}

/// A segment tick position, this is always linked to a [`ScheduledTick`] being added to
/// the tree map, this structure is also stored apart in order to check that two ticks
/// are not scheduled for the same position and segment id.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
struct ScheduledTickState {
    /// Position of the segment to tick.
    pos: IVec3,
    /// The expected id of the segment, if the segment has no longer this id, this tick
    /// is ignored.
    id: u8,
}

/// A segment tick scheduled in the future, it's associated to a world time in a tree
/// map. This structure is ordered by time and then by unique id.
#[derive(Clone, Eq)]
struct ScheduledTick {
    /// This tick unique id within the world.
    uid: u64,
    /// The time to tick the segment.
    time: u64,
    /// State of that scheduled tick.
    state: ScheduledTickState,
}

impl PartialEq for ScheduledTick {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid && self.time == other.time
    }
}

impl PartialOrd for ScheduledTick {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl Ord for ScheduledTick {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time)
            .then(self.uid.cmp(&other.uid))
    }
}


/// An iterator for segments in a world area, max excluded. Segments are yielded with
/// Y varying first, then Z, then X.
pub struct SegmentsInIter<'a> {
    world: &'a World,
    min: IVec3,
    max: IVec3,
    cursor: IVec3,
}

impl<'a> SegmentsInIter<'a> {

    fn new(world: &'a World, min: IVec3, max: IVec3) -> Self {
        // Clamp Y to the world height, an empty area is represented by a cursor past
        // the max X.
        let min = min.max(IVec3::new(i32::MIN, 0, i32::MIN));
        let max = max.min(IVec3::new(i32::MAX, CHUNK_HEIGHT as i32, i32::MAX));
        let cursor = if min.cmplt(max).all() { min } else { IVec3::new(max.x, min.y, min.z) };
        Self { world, min, max, cursor }
    }

}

impl FusedIterator for SegmentsInIter<'_> {}
impl Iterator for SegmentsInIter<'_> {

    type Item = (IVec3, Segment);

    fn next(&mut self) -> Option<Self::Item> {

        if self.cursor.x >= self.max.x {
            return None;
        }

        let pos = self.cursor;

        self.cursor.y += 1;
        if self.cursor.y >= self.max.y {
            self.cursor.y = self.min.y;
            self.cursor.z += 1;
            if self.cursor.z >= self.max.z {
                self.cursor.z = self.min.z;
                self.cursor.x += 1;
            }
        }

        Some((pos, self.world.get_segment(pos)))

    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn missing_chunks_are_empty() {
        let world = World::with_seed(0);
        assert_eq!(world.get_segment(IVec3::new(100, 64, -100)), Segment::Empty);
        assert_eq!(world.get_segment(IVec3::new(0, -1, 0)), Segment::Empty);
        assert_eq!(world.get_segment(IVec3::new(0, 300, 0)), Segment::Empty);
        assert_eq!(world.get_chunk_count(), 0);
    }

    #[test]
    fn set_segment_events() {

        let mut world = World::with_seed(0);
        world.swap_events(Some(Vec::new()));

        let pos = IVec3::new(-5, 10, 20);
        assert_eq!(world.set_segment(pos, Segment::bud(3)), Segment::Empty);
        // Same segment again, no event.
        assert_eq!(world.set_segment(pos, Segment::bud(3)), Segment::bud(3));
        assert_eq!(world.get_segment(pos), Segment::bud(3));
        assert_eq!(world.get_chunk_count(), 1);

        let events = world.swap_events(None).unwrap();
        assert_eq!(events, [Event::Segment {
            pos,
            inner: SegmentEvent::Set { segment: Segment::bud(3), prev: Segment::Empty },
        }]);

    }

    #[test]
    #[should_panic]
    fn set_segment_outside_height() {
        World::with_seed(0).set_segment(IVec3::new(0, 256, 0), Segment::Stem);
    }

    #[test]
    fn fill_across_chunks() {
        let mut world = World::with_seed(0);
        world.fill_segments(IVec3::new(-4, 60, -4), IVec3::new(4, 64, 4), Segment::Substrate);
        assert_eq!(world.get_chunk_count(), 4);
        assert_eq!(world.get_segment(IVec3::new(-4, 60, -4)), Segment::Substrate);
        assert_eq!(world.get_segment(IVec3::new(3, 63, 3)), Segment::Substrate);
        assert_eq!(world.get_segment(IVec3::new(4, 63, 3)), Segment::Empty);
        assert_eq!(world.get_segment(IVec3::new(0, 64, 0)), Segment::Empty);
        let count = world.iter_segments_in(IVec3::new(-8, 56, -8), IVec3::new(8, 68, 8))
            .filter(|&(_, segment)| segment == Segment::Substrate)
            .count();
        assert_eq!(count, 8 * 8 * 4);
    }

    #[test]
    fn iter_empty_area() {
        let world = World::with_seed(0);
        assert_eq!(world.iter_segments_in(IVec3::ZERO, IVec3::new(0, 5, 5)).count(), 0);
        assert_eq!(world.iter_segments_in(IVec3::ZERO, IVec3::new(2, 3, 4)).count(), 24);
    }

    #[test]
    fn place_bud_requires_support() {
        let mut world = World::with_seed(0);
        let pos = IVec3::new(0, 64, 0);
        assert!(!world.place_bud(pos));
        world.set_segment(pos - IVec3::Y, Segment::Substrate);
        assert!(world.place_bud(pos));
        assert_eq!(world.get_segment(pos), Segment::bud(0));
        assert!(!world.place_bud(pos));
    }

    #[test]
    fn scheduled_tick_deduplicated() {
        let mut world = World::with_seed(0);
        world.schedule_tick(IVec3::ZERO, segment::BUD, 1);
        world.schedule_tick(IVec3::ZERO, segment::BUD, 3);
        world.schedule_tick(IVec3::X, segment::BUD, 1);
        assert_eq!(world.get_scheduled_tick_count(), 2);
        world.tick();
        assert_eq!(world.get_scheduled_tick_count(), 2);
        world.tick();
        assert_eq!(world.get_scheduled_tick_count(), 0);
    }

}
