//! A chunk storing segments of a world column, optimized for runtime access.

use glam::IVec3;

use crate::segment::EMPTY;


/// Chunk size in both X and Z coordinates.
pub const CHUNK_WIDTH: usize = 16;
/// Chunk height, this is also the ceiling of the world.
pub const CHUNK_HEIGHT: usize = 256;
/// Internal chunk size, in number of elements per chunk.
const CHUNK_SIZE: usize = CHUNK_HEIGHT * CHUNK_WIDTH * CHUNK_WIDTH;


/// Calculate the index in the chunk's arrays for the given chunk-local position. The
/// layout is `xxxx zzzz yyyy yyyy`, only firsts relevant bits are taken in each
/// coordinate component.
#[inline]
fn calc_index(pos: IVec3) -> usize {
    debug_assert!(pos.y >= 0 && pos.y < CHUNK_HEIGHT as i32);
    let x = pos.x as u32 & 0b1111;
    let z = pos.z as u32 & 0b1111;
    let y = pos.y as u32 & 0b11111111;
    ((x << 12) | (z << 8) | y) as usize
}

/// Calculate the chunk position corresponding to the given position. This returns
/// no position if the Y coordinate is invalid.
#[inline]
pub fn calc_chunk_pos(pos: IVec3) -> Option<(i32, i32)> {
    if pos.y < 0 || pos.y >= CHUNK_HEIGHT as i32 {
        None
    } else {
        Some((pos.x >> 4, pos.z >> 4))
    }
}


/// Data structure storing every chunk-local data, chunks are a world subdivision of
/// 16x16x256 cells.
#[derive(Clone)]
pub struct Chunk {
    /// The numeric identifier of the segment.
    id: ChunkByteArray,
    /// Four bit metadata for each segment, this stores the maturity of buds.
    metadata: ChunkNibbleArray,
}

impl Chunk {

    /// Create a new empty chunk.
    pub fn new() -> Box<Self> {
        Box::new(Self {
            id: [EMPTY; CHUNK_SIZE],
            metadata: ChunkNibbleArray::new(0),
        })
    }

    /// Get segment id and metadata at the given global position (rebased to
    /// chunk-local). Panics if Y component of the position is not between 0 and 256
    /// (excluded).
    #[inline]
    pub fn get(&self, pos: IVec3) -> (u8, u8) {
        let index = calc_index(pos);
        (self.id[index], self.metadata.get(index))
    }

    /// Set segment id and metadata at the given global position (rebased to
    /// chunk-local). Panics if Y component of the position is not between 0 and 256
    /// (excluded).
    #[inline]
    pub fn set(&mut self, pos: IVec3, id: u8, metadata: u8) {
        let index = calc_index(pos);
        self.id[index] = id;
        self.metadata.set(index, metadata);
    }

    /// Fill the given chunk area with given segment id and metadata.
    pub fn fill(&mut self, start: IVec3, size: IVec3, id: u8, metadata: u8) {
        for x in start.x..start.x + size.x {
            for z in start.z..start.z + size.z {
                let mut index = calc_index(IVec3::new(x, start.y, z));
                for _ in start.y..start.y + size.y {
                    self.id[index] = id;
                    self.metadata.set(index, metadata);
                    // Increment Y component.
                    index += 1;
                }
            }
        }
    }

}

/// Type alias for a chunk array that stores `u8 * CHUNK_SIZE` values.
type ChunkByteArray = [u8; CHUNK_SIZE];

/// Special arrays for chunks that stores `u4 * CHUNK_SIZE` values.
#[derive(Clone)]
struct ChunkNibbleArray {
    inner: [u8; CHUNK_SIZE / 2]
}

impl ChunkNibbleArray {

    const fn new(init: u8) -> Self {
        debug_assert!(init <= 0x0F);
        let init = init << 4 | init;
        Self { inner: [init; CHUNK_SIZE / 2] }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        let slot = self.inner[index >> 1];
        if index & 1 == 0 {
            slot & 0x0F
        } else {
            (slot & 0xF0) >> 4
        }
    }

    #[inline]
    fn set(&mut self, index: usize, value: u8) {
        debug_assert!(value <= 0x0F);
        let slot = &mut self.inner[index >> 1];
        if index & 1 == 0 {
            *slot = (*slot & 0xF0) | value;
        } else {
            *slot = (*slot & 0x0F) | (value << 4);
        }
    }

}
