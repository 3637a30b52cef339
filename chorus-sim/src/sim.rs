//! The simulation driving a world of chorus plants.

use std::time::{Duration, Instant};

use glam::IVec3;

use tracing::{debug, info, warn, instrument};

use chorus::world::{World, Event, SegmentEvent};
use chorus::segment::Segment;
use chorus::grid::Feedback;

use crate::config::{SimConfig, ConfigError};


/// Target tick duration. Currently 20 TPS, so 50 ms/tick.
const TICK_DURATION: Duration = Duration::from_millis(50);

/// Height of the island's surface, plants are rooted just above.
const ISLAND_SURFACE: i32 = 64;
/// Thickness of the substrate island.
const ISLAND_DEPTH: i32 = 4;


/// A world of chorus plants growing on a single substrate island. Even plants are
/// generated fully grown, odd plants start as a single bud and grow through ticks.
pub struct Simulation {
    /// The inner world.
    world: World,
    /// Counters of what happened in the world.
    stats: SimStats,
    /// Area containing all plants, max excluded.
    area: (IVec3, IVec3),
    /// Sliding average tick duration, in seconds.
    tick_duration: f32,
}

/// Counters of world events since the simulation started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Number of buds grown.
    pub grown: u32,
    /// Number of buds matured.
    pub matured: u32,
    /// Number of destroyed segments.
    pub destroyed: u32,
}

impl Simulation {

    /// Create the simulation world, its island and its plants. The configuration is
    /// validated first.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {

        config.validate()?;

        let mut world = match config.seed {
            Some(seed) => World::with_seed(seed),
            None => World::new(),
        };

        world.set_random_ticks(config.random_ticks);

        let radius = config.radius;
        let spacing = radius * 2;
        // Validated bounds keep the island coordinates small.
        let plants = config.plants as i32;

        let island_min = IVec3::new(-radius, ISLAND_SURFACE - ISLAND_DEPTH, -radius);
        let island_max = IVec3::new(plants.max(1) * spacing - radius, ISLAND_SURFACE, radius);
        world.fill_segments(island_min, island_max, Segment::Substrate);

        // Plants growing through ticks are not bound by the radius.
        let margin = IVec3::new(16, 0, 16);
        let area = (
            IVec3::new(island_min.x, ISLAND_SURFACE, island_min.z) - margin,
            IVec3::new(island_max.x, 256, island_max.z) + margin,
        );

        for i in 0..plants {
            let pos = IVec3::new(i * spacing, ISLAND_SURFACE, 0);
            if i % 2 == 0 {
                match world.grow_chorus(pos, radius) {
                    Some(stats) => info!("plant #{i} generated at {pos} with {} stems and {} buds", stats.stems, stats.buds),
                    None => warn!("plant #{i} could not be generated at {pos}"),
                }
            } else if world.place_bud(pos) {
                info!("plant #{i} planted at {pos}");
            } else {
                warn!("plant #{i} could not be planted at {pos}");
            }
        }

        // Only events from ticks are counted.
        world.swap_events(Some(Vec::new()));

        Ok(Self {
            world,
            stats: SimStats::default(),
            area,
            tick_duration: 0.0,
        })

    }

    /// Get the inner world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get the counters of world events.
    pub fn stats(&self) -> SimStats {
        self.stats
    }

    /// Run a single tick of the world. This function also waits for this function to
    /// approximately last for 50 ms (20 TPS), there is no sleep if the tick was too
    /// long, in such case a warning is logged.
    pub fn tick_padded(&mut self) {

        let start = Instant::now();
        self.tick();
        let elapsed = start.elapsed();

        if let Some(missing) = TICK_DURATION.checked_sub(elapsed) {
            std::thread::sleep(missing);
        } else {
            warn!("tick too long {:?}, expected {:?}", elapsed, TICK_DURATION);
        }

    }

    /// Run a single tick of the world and account its events.
    #[instrument(skip_all)]
    pub fn tick(&mut self) {

        let start = Instant::now();
        self.world.tick();

        // Swap events out in order to proceed them.
        let mut events = self.world.swap_events(None).unwrap_or_default();
        for event in events.drain(..) {
            match event {
                Event::Segment { pos, inner } => match inner {
                    SegmentEvent::Set { .. } => {}
                    SegmentEvent::Destroy { prev } => {
                        debug!("destroyed {prev:?} at {pos}");
                        self.stats.destroyed += 1;
                    }
                    SegmentEvent::Feedback { feedback } => {
                        debug!("feedback {feedback:?} (effect {}) at {pos}", feedback.effect_id());
                        match feedback {
                            Feedback::Grow => self.stats.grown += 1,
                            Feedback::Mature => self.stats.matured += 1,
                        }
                    }
                }
            }
        }

        // Reinsert events after processing.
        self.world.swap_events(Some(events));

        let time = self.world.get_time();
        if time % 200 == 0 {
            info!("time {time}: {} grown, {} matured, {} destroyed, average tick {:.3} ms",
                self.stats.grown, self.stats.matured, self.stats.destroyed,
                self.tick_duration * 1000.0);
        }

        // Update tick duration metric.
        let tick_duration = start.elapsed();
        self.tick_duration = (self.tick_duration * 0.98) + tick_duration.as_secs_f32() * 0.02;

    }

    /// Log a final summary of the plants in the world.
    pub fn stop(&self) {

        let (mut stems, mut buds, mut mature) = (0, 0, 0);
        let (min, max) = self.area;
        for (_, segment) in self.world.iter_segments_in(min, max) {
            match segment {
                Segment::Stem => stems += 1,
                Segment::Bud { maturity } => {
                    buds += 1;
                    if maturity == chorus::segment::MAX_MATURITY {
                        mature += 1;
                    }
                }
                _ => {}
            }
        }

        info!("stopped at time {}: {stems} stems, {buds} buds ({mature} mature)", self.world.get_time());

    }

}
