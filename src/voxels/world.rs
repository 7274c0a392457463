//! # World Module
//!
//! This module provides the `VoxelWorld` struct which owns the set of loaded
//! chunks and serves every voxel query of the simulation: block get/set,
//! solidity, ray casting, bounds checks, spawn search, and the streaming
//! pass that keeps chunks resident around the player.
//!
//! ## Architecture
//!
//! Chunks are stored sparsely in a hash map keyed by chunk coordinates;
//! only columns near the player are resident. Chunk generation and meshing
//! are synchronous and run inside the frame that requests them, so a large
//! streaming radius directly costs frame time. That trade-off is deliberate;
//! re-architecting it means introducing background generation with a
//! handoff queue, not hiding the cost.
//!
//! ## Error Handling
//!
//! Coordinate mistakes are not errors: reads outside the world or inside an
//! unloaded chunk return `AIR`, and writes there are dropped silently (a
//! debug log records the drop).

use std::collections::HashMap;

use cgmath::{Point3, Vector3};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::block::block_type::BlockType;
use super::chunk::{Chunk, ChunkKey, CHUNK_SIZE, WORLD_HEIGHT};
use super::terrain::TerrainGenerator;
use crate::meshing::RenderSink;

/// Default streaming radius, in chunks.
pub const DEFAULT_RENDER_DISTANCE: i32 = 6;

/// Extra chunk-distance beyond the streaming radius before a resident
/// chunk is evicted. The margin keeps chunks from thrashing in and out
/// when the player oscillates near the radius boundary.
const EVICTION_MARGIN: i32 = 2;

/// Fixed step of the ray march, in world units.
const RAYCAST_STEP: f32 = 0.1;

/// Maximum ray march distance, in world units.
const RAYCAST_MAX_DISTANCE: f32 = 8.0;

/// Axis-aligned world bounds used for fall-through detection.
#[derive(Debug, Clone, Copy)]
pub struct WorldBounds {
    /// Minimum corner of the playable volume.
    pub min: Point3<f32>,
    /// Maximum corner of the playable volume.
    pub max: Point3<f32>,
}

/// The result of a successful ray march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Integer coordinate of the first solid voxel along the ray.
    pub block: Point3<i32>,
    /// Material of the hit voxel.
    pub block_type: BlockType,
    /// The cell sampled immediately before the hit; placing a block goes
    /// here.
    pub placement: Point3<i32>,
}

/// Serializable world state: the save/load contract.
///
/// Chunks are keyed by `"cx,cz"` strings and store their dense voxel
/// buffers as raw material bytes in `x + size * (y + height * z)` order.
/// The structure is not validated on load; well-formedness is the
/// caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldData {
    /// Voxel buffers of every loaded chunk, keyed `"cx,cz"`.
    pub chunks: HashMap<String, Vec<u8>>,
    /// The world spawn point.
    pub spawn_point: [f32; 3],
    /// The world bounds.
    pub bounds: WorldBoundsData,
    /// Horizontal chunk dimension the buffers were encoded with.
    pub chunk_size: i32,
    /// World height the buffers were encoded with.
    pub world_height: i32,
}

/// Serializable form of [`WorldBounds`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorldBoundsData {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

/// Owns the loaded chunks and the world-level queries over them.
///
/// Created once per game session. Mutated only by block edits and the
/// periodic streaming pass; never destroyed mid-session except by a full
/// world reload.
pub struct VoxelWorld {
    chunks: HashMap<ChunkKey, Chunk>,
    terrain: TerrainGenerator,
    bounds: WorldBounds,
    spawn_point: Point3<f32>,
    render_distance: i32,
}

impl VoxelWorld {
    /// Creates an empty world with the given streaming radius.
    ///
    /// No chunks are generated; call [`VoxelWorld::generate_initial_chunks`]
    /// to populate the area around the spawn point.
    pub fn new(render_distance: i32) -> Self {
        VoxelWorld {
            chunks: HashMap::new(),
            terrain: TerrainGenerator::new(),
            bounds: WorldBounds {
                min: Point3::new(-1000.0, 0.0, -1000.0),
                max: Point3::new(1000.0, WORLD_HEIGHT as f32, 1000.0),
            },
            spawn_point: Point3::new(0.0, 70.0, 0.0),
            render_distance,
        }
    }

    /// Synchronously generates the full square of chunks around the origin.
    ///
    /// Unlike the streaming pass, the initial load fills the whole
    /// `(2R+1) x (2R+1)` square so the session starts with a complete
    /// neighborhood before the first frame renders.
    pub fn generate_initial_chunks(&mut self, sink: &mut dyn RenderSink) {
        for x in -self.render_distance..=self.render_distance {
            for z in -self.render_distance..=self.render_distance {
                self.ensure_chunk(ChunkKey::new(x, z), sink);
            }
        }
        info!("generated {} initial chunks", self.chunks.len());
    }

    /// The number of chunks currently resident.
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the chunk at `key` is resident.
    pub fn is_chunk_loaded(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    /// The world spawn point.
    pub fn spawn_point(&self) -> Point3<f32> {
        self.spawn_point
    }

    /// Reads the voxel at world coordinates.
    ///
    /// Returns `AIR` for any `y` outside `[0, WORLD_HEIGHT)` and for any
    /// column whose chunk is not resident.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        if !(0..WORLD_HEIGHT).contains(&y) {
            return BlockType::AIR;
        }
        let key = ChunkKey::from_world_pos(x, z);
        match self.chunks.get(&key) {
            Some(chunk) => chunk.get_block(x.rem_euclid(CHUNK_SIZE), y, z.rem_euclid(CHUNK_SIZE)),
            None => BlockType::AIR,
        }
    }

    /// O(1) solidity predicate used by player collision and the ray march.
    pub fn block_is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        if !(0..WORLD_HEIGHT).contains(&y) {
            return false;
        }
        let key = ChunkKey::from_world_pos(x, z);
        match self.chunks.get(&key) {
            Some(chunk) => chunk.is_solid(x.rem_euclid(CHUNK_SIZE), y, z.rem_euclid(CHUNK_SIZE)),
            None => false,
        }
    }

    /// Writes the voxel at world coordinates and republishes affected
    /// meshes.
    ///
    /// Writes outside the world height or into an unloaded chunk are
    /// dropped silently. A successful write rebuilds the owning chunk's
    /// mesh, and, when the cell lies on a chunk boundary, the meshes of
    /// the up-to-4 edge-adjacent resident chunks so seams stay consistent.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType, sink: &mut dyn RenderSink) {
        if !(0..WORLD_HEIGHT).contains(&y) {
            return;
        }
        let key = ChunkKey::from_world_pos(x, z);
        let local_x = x.rem_euclid(CHUNK_SIZE);
        let local_z = z.rem_euclid(CHUNK_SIZE);

        let Some(chunk) = self.chunks.get_mut(&key) else {
            debug!("dropped edit at ({x},{y},{z}): chunk {key} not loaded");
            return;
        };
        chunk.set_block(local_x, y, local_z, block);
        self.rebuild_chunk_mesh(key, sink);

        let mut neighbors = Vec::new();
        if local_x == 0 {
            neighbors.push(ChunkKey::new(key.x - 1, key.z));
        }
        if local_x == CHUNK_SIZE - 1 {
            neighbors.push(ChunkKey::new(key.x + 1, key.z));
        }
        if local_z == 0 {
            neighbors.push(ChunkKey::new(key.x, key.z - 1));
        }
        if local_z == CHUNK_SIZE - 1 {
            neighbors.push(ChunkKey::new(key.x, key.z + 1));
        }
        for neighbor in neighbors {
            self.rebuild_chunk_mesh(neighbor, sink);
        }
    }

    /// Streams chunks around the player: generates every chunk within the
    /// streaming radius and evicts every chunk beyond radius + 2.
    ///
    /// Invoked by the frame loop on its streaming cadence, not every
    /// frame; generation and meshing run synchronously inside this call.
    pub fn stream_chunks(&mut self, player_pos: Point3<f32>, sink: &mut dyn RenderSink) {
        let player_chunk =
            ChunkKey::from_world_pos(player_pos.x.floor() as i32, player_pos.z.floor() as i32);
        let radius = self.render_distance;

        for x in (player_chunk.x - radius)..=(player_chunk.x + radius) {
            for z in (player_chunk.z - radius)..=(player_chunk.z + radius) {
                let key = ChunkKey::new(x, z);
                if player_chunk.distance_to(key) <= radius as f64 {
                    self.ensure_chunk(key, sink);
                }
            }
        }

        let eviction_limit = (radius + EVICTION_MARGIN) as f64;
        let to_evict: Vec<ChunkKey> = self
            .chunks
            .keys()
            .filter(|key| player_chunk.distance_to(**key) > eviction_limit)
            .copied()
            .collect();
        for key in to_evict {
            self.chunks.remove(&key);
            sink.remove_chunk_mesh(key);
            debug!("evicted chunk {key}");
        }
    }

    /// Generates, meshes, and registers the chunk at `key` if it is not
    /// already resident.
    fn ensure_chunk(&mut self, key: ChunkKey, sink: &mut dyn RenderSink) {
        if self.chunks.contains_key(&key) {
            return;
        }
        let mut chunk = Chunk::new(key);
        chunk.generate(&self.terrain);
        self.chunks.insert(key, chunk);
        self.rebuild_chunk_mesh(key, sink);
        debug!("generated chunk {key}");
    }

    /// Rebuilds and republishes the mesh of a resident chunk; a no-op for
    /// chunks that are not loaded.
    fn rebuild_chunk_mesh(&mut self, key: ChunkKey, sink: &mut dyn RenderSink) {
        if let Some(chunk) = self.chunks.get_mut(&key) {
            let mesh = chunk.build_mesh();
            chunk.mark_clean();
            sink.upsert_chunk_mesh(key, &mesh);
        }
    }

    /// Marches a ray through the voxel grid and returns the first solid
    /// hit.
    ///
    /// The march samples the grid every 0.1 world units out to 8 units.
    /// On a hit, the previously sampled cell is reported as the placement
    /// coordinate; `None` means the ray exhausted its range in air.
    pub fn raycast(&self, origin: Point3<f32>, direction: Vector3<f32>) -> Option<RayHit> {
        let mut distance = 0.0f32;
        while distance < RAYCAST_MAX_DISTANCE {
            let current = origin + direction * distance;
            let (x, y, z) = (
                current.x.floor() as i32,
                current.y.floor() as i32,
                current.z.floor() as i32,
            );

            let block_type = self.get_block(x, y, z);
            if block_type != BlockType::AIR {
                let previous = origin + direction * (distance - RAYCAST_STEP);
                return Some(RayHit {
                    block: Point3::new(x, y, z),
                    block_type,
                    placement: Point3::new(
                        previous.x.floor() as i32,
                        previous.y.floor() as i32,
                        previous.z.floor() as i32,
                    ),
                });
            }
            distance += RAYCAST_STEP;
        }
        None
    }

    /// Axis-aligned test against the world bounds, used for fall-through
    /// and void detection.
    pub fn is_out_of_bounds(&self, position: Point3<f32>) -> bool {
        position.x < self.bounds.min.x
            || position.x > self.bounds.max.x
            || position.y < self.bounds.min.y
            || position.y > self.bounds.max.y
            || position.z < self.bounds.min.z
            || position.z > self.bounds.max.z
    }

    /// Searches for a safe spawn location near `center`.
    ///
    /// Expanding rings (radius 0..50 in steps of 5, angles in steps of
    /// pi/8) are probed; each candidate column is scanned from the world
    /// top down to y = 11 for the first solid voxel with three air cells
    /// of headroom. Falls back to the stored spawn point if every
    /// candidate fails.
    pub fn find_safe_spawn_point(&self, center: Point3<f32>) -> Point3<f32> {
        for radius in (0..50).step_by(5) {
            for step in 0..16 {
                let angle = step as f64 * std::f64::consts::FRAC_PI_8;
                let test_x = (center.x as f64 + angle.cos() * radius as f64).floor() as i32;
                let test_z = (center.z as f64 + angle.sin() * radius as f64).floor() as i32;

                for y in (11..WORLD_HEIGHT).rev() {
                    if self.get_block(test_x, y, test_z) != BlockType::AIR
                        && self.get_block(test_x, y + 1, test_z) == BlockType::AIR
                        && self.get_block(test_x, y + 2, test_z) == BlockType::AIR
                        && self.get_block(test_x, y + 3, test_z) == BlockType::AIR
                    {
                        return Point3::new(test_x as f32 + 0.5, (y + 3) as f32, test_z as f32 + 0.5);
                    }
                }
            }
        }
        self.spawn_point
    }

    /// Produces the serializable world state of every resident chunk.
    pub fn world_data(&self) -> WorldData {
        let chunks = self
            .chunks
            .iter()
            .map(|(key, chunk)| (key.to_string(), chunk.voxel_data()))
            .collect();

        WorldData {
            chunks,
            spawn_point: [self.spawn_point.x, self.spawn_point.y, self.spawn_point.z],
            bounds: WorldBoundsData {
                min: [self.bounds.min.x, self.bounds.min.y, self.bounds.min.z],
                max: [self.bounds.max.x, self.bounds.max.y, self.bounds.max.z],
            },
            chunk_size: CHUNK_SIZE,
            world_height: WORLD_HEIGHT,
        }
    }

    /// Replaces all resident chunks with the contents of a save.
    ///
    /// Every existing chunk mesh is released from the sink first, then the
    /// saved chunks are decoded, meshed, and registered. The input is
    /// assumed well-formed.
    ///
    /// # Panics
    /// Panics if a chunk key or voxel byte in the save does not decode.
    pub fn load_world_data(&mut self, data: WorldData, sink: &mut dyn RenderSink) {
        let old_keys: Vec<ChunkKey> = self.chunks.keys().copied().collect();
        for key in old_keys {
            sink.remove_chunk_mesh(key);
        }
        self.chunks.clear();

        for (key_string, voxels) in &data.chunks {
            let key: ChunkKey = key_string.parse().unwrap();
            let chunk = Chunk::from_voxel_data(key, voxels);
            self.chunks.insert(key, chunk);
            self.rebuild_chunk_mesh(key, sink);
        }

        self.spawn_point = Point3::new(
            data.spawn_point[0],
            data.spawn_point[1],
            data.spawn_point[2],
        );
        info!("loaded {} chunks from save data", self.chunks.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshing::{MeshData, NullRenderSink};

    /// Records sink traffic so tests can observe mesh churn.
    #[derive(Default)]
    struct RecordingSink {
        upserts: Vec<ChunkKey>,
        removals: Vec<ChunkKey>,
    }

    impl RenderSink for RecordingSink {
        fn upsert_chunk_mesh(&mut self, key: ChunkKey, _mesh: &MeshData) {
            self.upserts.push(key);
        }
        fn remove_chunk_mesh(&mut self, key: ChunkKey) {
            self.removals.push(key);
        }
        fn upsert_entity(
            &mut self,
            _id: &str,
            _kind: crate::entities::EntityKind,
            _position: Point3<f32>,
            _yaw: f32,
        ) {
        }
        fn remove_entity(&mut self, _id: &str) {}
        fn set_avatar_visible(&mut self, _visible: bool) {}
    }

    fn world_with_empty_chunk(key: ChunkKey) -> VoxelWorld {
        let mut world = VoxelWorld::new(2);
        world.chunks.insert(key, Chunk::new(key));
        world
    }

    #[test]
    fn get_after_set_round_trips_in_a_loaded_chunk() {
        let mut world = world_with_empty_chunk(ChunkKey::new(0, 0));
        let mut sink = NullRenderSink;
        world.set_block(5, 60, 9, BlockType::COBBLESTONE, &mut sink);
        assert_eq!(world.get_block(5, 60, 9), BlockType::COBBLESTONE);
    }

    #[test]
    fn reads_outside_the_height_range_are_air() {
        let world = world_with_empty_chunk(ChunkKey::new(0, 0));
        assert_eq!(world.get_block(0, -1, 0), BlockType::AIR);
        assert_eq!(world.get_block(0, WORLD_HEIGHT, 0), BlockType::AIR);
        assert_eq!(world.get_block(12, 4000, 12), BlockType::AIR);
    }

    #[test]
    fn writes_into_unloaded_chunks_are_dropped() {
        let mut world = world_with_empty_chunk(ChunkKey::new(0, 0));
        let mut sink = RecordingSink::default();
        world.set_block(100, 60, 100, BlockType::STONE, &mut sink);
        assert_eq!(world.get_block(100, 60, 100), BlockType::AIR);
        assert!(sink.upserts.is_empty());
    }

    #[test]
    fn boundary_edit_rebuilds_the_adjacent_chunk() {
        let mut world = world_with_empty_chunk(ChunkKey::new(0, 0));
        world
            .chunks
            .insert(ChunkKey::new(-1, 0), Chunk::new(ChunkKey::new(-1, 0)));
        let mut sink = RecordingSink::default();

        world.set_block(0, 60, 5, BlockType::STONE, &mut sink);
        assert_eq!(sink.upserts.len(), 2);
        assert!(sink.upserts.contains(&ChunkKey::new(0, 0)));
        assert!(sink.upserts.contains(&ChunkKey::new(-1, 0)));

        // An interior edit touches only the owning chunk.
        sink.upserts.clear();
        world.set_block(10, 60, 10, BlockType::STONE, &mut sink);
        assert_eq!(sink.upserts, vec![ChunkKey::new(0, 0)]);
    }

    #[test]
    fn streaming_respects_load_and_eviction_radii() {
        let mut world = VoxelWorld::new(3);
        let mut sink = NullRenderSink;
        world.stream_chunks(Point3::new(0.0, 64.0, 0.0), &mut sink);

        let origin = ChunkKey::new(0, 0);
        for x in -3..=3 {
            for z in -3..=3 {
                let key = ChunkKey::new(x, z);
                if origin.distance_to(key) <= 3.0 {
                    assert!(world.is_chunk_loaded(key), "missing chunk {key}");
                }
            }
        }

        // Walk far away; everything beyond R + 2 of the new position must
        // be evicted and the new neighborhood loaded.
        let far = Point3::new(20.0 * CHUNK_SIZE as f32, 64.0, 0.0);
        world.stream_chunks(far, &mut sink);
        let far_chunk = ChunkKey::new(20, 0);
        for key in world.chunks.keys() {
            assert!(far_chunk.distance_to(*key) <= 5.0, "stale chunk {key}");
        }
        assert!(world.is_chunk_loaded(far_chunk));
    }

    #[test]
    fn raycast_reports_hit_and_placement_cells() {
        let mut world = world_with_empty_chunk(ChunkKey::new(0, 0));
        let mut sink = NullRenderSink;
        world.set_block(5, 60, 5, BlockType::STONE, &mut sink);

        let hit = world
            .raycast(Point3::new(5.5, 60.5, 0.5), Vector3::new(0.0, 0.0, 1.0))
            .expect("ray should hit the stone voxel");
        assert_eq!(hit.block, Point3::new(5, 60, 5));
        assert_eq!(hit.block_type, BlockType::STONE);
        assert_eq!(hit.placement, Point3::new(5, 60, 4));
    }

    #[test]
    fn raycast_misses_beyond_max_distance() {
        let mut world = world_with_empty_chunk(ChunkKey::new(0, 0));
        let mut sink = NullRenderSink;
        world.set_block(5, 60, 15, BlockType::STONE, &mut sink);

        // The voxel is 14.5 units away, well past the 8-unit limit.
        let miss = world.raycast(Point3::new(5.5, 60.5, 0.5), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(miss, None);
    }

    #[test]
    fn safe_spawn_points_have_headroom() {
        let key = ChunkKey::new(0, 0);
        let mut world = world_with_empty_chunk(key);
        let mut sink = NullRenderSink;
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                world.set_block(x, 50, z, BlockType::STONE, &mut sink);
            }
        }

        let spawn = world.find_safe_spawn_point(Point3::new(16.0, 0.0, 16.0));
        assert_eq!(spawn.y, 53.0);

        // The point sits three cells above solid ground, with the cells at
        // and above it clear.
        let (x, z) = (spawn.x.floor() as i32, spawn.z.floor() as i32);
        let y = spawn.y as i32;
        assert!(world.get_block(x, y - 3, z).is_solid());
        for dy in 0..3 {
            assert_eq!(world.get_block(x, y + dy, z), BlockType::AIR);
        }
    }

    #[test]
    fn spawn_search_falls_back_on_an_empty_world() {
        let world = VoxelWorld::new(2);
        let spawn = world.find_safe_spawn_point(Point3::new(0.0, 0.0, 0.0));
        assert_eq!(spawn, world.spawn_point());
    }

    #[test]
    fn world_data_round_trips_through_load() {
        let mut world = world_with_empty_chunk(ChunkKey::new(0, 0));
        let mut sink = NullRenderSink;
        world.set_block(7, 42, 3, BlockType::PLANKS, &mut sink);
        world.set_block(0, 0, 0, BlockType::BEDROCK, &mut sink);

        let data = world.world_data();
        assert_eq!(data.chunk_size, CHUNK_SIZE);
        assert_eq!(data.world_height, WORLD_HEIGHT);
        assert!(data.chunks.contains_key("0,0"));

        let mut restored = VoxelWorld::new(2);
        restored.load_world_data(data, &mut sink);
        assert_eq!(restored.get_block(7, 42, 3), BlockType::PLANKS);
        assert_eq!(restored.get_block(0, 0, 0), BlockType::BEDROCK);
    }

    #[test]
    fn world_data_survives_a_json_round_trip() {
        let mut world = world_with_empty_chunk(ChunkKey::new(-1, 2));
        let mut sink = NullRenderSink;
        world.set_block(-5, 30, 70, BlockType::GLASS, &mut sink);

        let json = serde_json::to_string(&world.world_data()).unwrap();
        let decoded: WorldData = serde_json::from_str(&json).unwrap();

        let mut restored = VoxelWorld::new(2);
        restored.load_world_data(decoded, &mut sink);
        assert_eq!(restored.get_block(-5, 30, 70), BlockType::GLASS);
    }

    #[test]
    fn initial_generation_fills_the_full_square() {
        let mut world = VoxelWorld::new(4);
        let mut sink = NullRenderSink;
        world.generate_initial_chunks(&mut sink);
        assert_eq!(world.loaded_chunk_count(), 81);
    }
}
