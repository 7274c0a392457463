//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one fixed-size column of voxels,
//! the unit of generation, meshing, and streaming.
//!
//! ## Storage
//!
//! Voxels live in a single flat buffer indexed `x + SIZE * (y + HEIGHT * z)`,
//! avoiding nested per-axis arrays and keeping column scans local. A bit
//! vector mirrors the buffer with one solidity bit per voxel; the mesher and
//! collision queries consult the mask without touching the material data.

use bitvec::prelude::BitVec;
use serde::{Deserialize, Serialize};

use super::block::block_type::BlockType;
use super::block::BlockTypeSize;

mod chunk_generation;
mod chunk_meshing;

/// The horizontal dimension (width and depth) of a chunk in voxels.
pub const CHUNK_SIZE: i32 = 32;
/// The vertical dimension of every chunk; also the world height.
pub const WORLD_HEIGHT: i32 = 128;
/// The total number of voxels in a chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * WORLD_HEIGHT * CHUNK_SIZE) as usize;

/// Identifies a chunk by its integer column coordinates.
///
/// World voxel `(x, z)` maps to the chunk at `(x div SIZE, z div SIZE)`
/// using Euclidean division so negative coordinates resolve correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkKey {
    /// Chunk column index along X.
    pub x: i32,
    /// Chunk column index along Z.
    pub z: i32,
}

impl ChunkKey {
    /// Creates a key from chunk coordinates.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkKey { x, z }
    }

    /// Resolves the key of the chunk owning world voxel column `(x, z)`.
    pub fn from_world_pos(world_x: i32, world_z: i32) -> Self {
        ChunkKey {
            x: world_x.div_euclid(CHUNK_SIZE),
            z: world_z.div_euclid(CHUNK_SIZE),
        }
    }

    /// The world coordinate of this chunk's minimum corner.
    pub fn world_origin(&self) -> (i32, i32) {
        (self.x * CHUNK_SIZE, self.z * CHUNK_SIZE)
    }

    /// Euclidean distance to another chunk key, in chunk units.
    pub fn distance_to(&self, other: ChunkKey) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dz = (self.z - other.z) as f64;
        (dx * dx + dz * dz).sqrt()
    }
}

impl std::fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

impl std::str::FromStr for ChunkKey {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, z) = s.split_once(',').unwrap_or((s, "0"));
        Ok(ChunkKey {
            x: x.trim().parse()?,
            z: z.trim().parse()?,
        })
    }
}

/// One fixed-size column of voxels plus its meshing state.
///
/// Chunks are created and populated exactly once, on first reference by the
/// world's streaming pass; any later edit marks the chunk dirty and the
/// owner rebuilds the whole mesh. There is no incremental re-meshing, which
/// bounds editing throughput but keeps the mesh trivially consistent.
pub struct Chunk {
    key: ChunkKey,
    blocks: Vec<BlockType>,
    solid: BitVec,
    dirty: bool,
}

impl Chunk {
    /// Creates a new, empty chunk (all voxels air) at the given key.
    pub fn new(key: ChunkKey) -> Self {
        Chunk {
            key,
            blocks: vec![BlockType::AIR; CHUNK_VOLUME],
            solid: BitVec::repeat(false, CHUNK_VOLUME),
            dirty: true,
        }
    }

    /// The key identifying this chunk.
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    /// Converts chunk-local coordinates to a flat buffer index.
    #[inline]
    fn index(x: i32, y: i32, z: i32) -> usize {
        (x + CHUNK_SIZE * (y + WORLD_HEIGHT * z)) as usize
    }

    /// Whether chunk-local coordinates address a voxel of this chunk.
    #[inline]
    pub fn in_range(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_SIZE).contains(&x) && (0..WORLD_HEIGHT).contains(&y) && (0..CHUNK_SIZE).contains(&z)
    }

    /// Reads the voxel at chunk-local coordinates.
    ///
    /// Out-of-range coordinates read as `AIR`.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !Self::in_range(x, y, z) {
            return BlockType::AIR;
        }
        self.blocks[Self::index(x, y, z)]
    }

    /// Writes the voxel at chunk-local coordinates and marks the chunk
    /// dirty. Out-of-range writes are ignored.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if !Self::in_range(x, y, z) {
            return;
        }
        let index = Self::index(x, y, z);
        self.blocks[index] = block;
        self.solid.set(index, block.is_solid());
        self.dirty = true;
    }

    /// O(1) solidity check against the bit mask.
    ///
    /// Out-of-range coordinates are non-solid.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        Self::in_range(x, y, z) && self.solid[Self::index(x, y, z)]
    }

    /// Whether the chunk has been edited since its mesh was last built.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag after the owner has rebuilt the mesh.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Encodes the voxel buffer as raw material bytes for the save format.
    pub fn voxel_data(&self) -> Vec<BlockTypeSize> {
        self.blocks.iter().map(|b| *b as BlockTypeSize).collect()
    }

    /// Rebuilds a chunk from raw save-format bytes.
    ///
    /// The input is assumed well-formed (full volume, valid materials);
    /// validating it is the caller's responsibility.
    ///
    /// # Panics
    /// Panics if a byte does not name a material.
    pub fn from_voxel_data(key: ChunkKey, data: &[BlockTypeSize]) -> Self {
        let mut chunk = Chunk::new(key);
        for (index, raw) in data.iter().enumerate().take(CHUNK_VOLUME) {
            let block = BlockType::from_int(*raw);
            chunk.blocks[index] = block;
            chunk.solid.set(index, block.is_solid());
        }
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_key_resolution_handles_negative_coordinates() {
        assert_eq!(ChunkKey::from_world_pos(0, 0), ChunkKey::new(0, 0));
        assert_eq!(ChunkKey::from_world_pos(31, 31), ChunkKey::new(0, 0));
        assert_eq!(ChunkKey::from_world_pos(32, 0), ChunkKey::new(1, 0));
        assert_eq!(ChunkKey::from_world_pos(-1, -32), ChunkKey::new(-1, -1));
        assert_eq!(ChunkKey::from_world_pos(-33, 0), ChunkKey::new(-2, 0));
    }

    #[test]
    fn chunk_key_string_round_trip() {
        let key = ChunkKey::new(-7, 12);
        let parsed: ChunkKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn get_after_set_returns_the_written_block() {
        let mut chunk = Chunk::new(ChunkKey::new(0, 0));
        chunk.mark_clean();
        chunk.set_block(5, 60, 9, BlockType::STONE);
        assert_eq!(chunk.get_block(5, 60, 9), BlockType::STONE);
        assert!(chunk.is_solid(5, 60, 9));
        assert!(chunk.is_dirty());

        chunk.set_block(5, 60, 9, BlockType::AIR);
        assert_eq!(chunk.get_block(5, 60, 9), BlockType::AIR);
        assert!(!chunk.is_solid(5, 60, 9));
    }

    #[test]
    fn out_of_range_access_is_air_and_ignored() {
        let mut chunk = Chunk::new(ChunkKey::new(0, 0));
        assert_eq!(chunk.get_block(-1, 0, 0), BlockType::AIR);
        assert_eq!(chunk.get_block(0, WORLD_HEIGHT, 0), BlockType::AIR);
        chunk.set_block(CHUNK_SIZE, 0, 0, BlockType::STONE);
        assert!(!chunk.is_solid(CHUNK_SIZE, 0, 0));
    }

    #[test]
    fn voxel_data_round_trip_preserves_blocks() {
        let mut chunk = Chunk::new(ChunkKey::new(2, -3));
        chunk.set_block(0, 0, 0, BlockType::BEDROCK);
        chunk.set_block(31, 127, 31, BlockType::GLASS);
        chunk.set_block(16, 64, 16, BlockType::DIAMOND_ORE);

        let restored = Chunk::from_voxel_data(chunk.key(), &chunk.voxel_data());
        assert_eq!(restored.get_block(0, 0, 0), BlockType::BEDROCK);
        assert_eq!(restored.get_block(31, 127, 31), BlockType::GLASS);
        assert_eq!(restored.get_block(16, 64, 16), BlockType::DIAMOND_ORE);
        assert!(restored.is_solid(16, 64, 16));
        assert!(!restored.is_solid(1, 1, 1));
    }
}
