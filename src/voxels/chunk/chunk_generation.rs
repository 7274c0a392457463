//! # Chunk Generation
//!
//! Populates a chunk's voxel buffer from the terrain generator. Generation
//! runs exactly once per chunk, synchronously, in the frame that first
//! references the chunk.

use super::{Chunk, CHUNK_SIZE, WORLD_HEIGHT};
use crate::voxels::block::block_type::BlockType;
use crate::voxels::terrain::TerrainGenerator;

/// Number of canopy layers above the trunk base offset.
const CANOPY_RADIUS: i32 = 3;

impl Chunk {
    /// Fills the chunk from the terrain generator.
    ///
    /// Every column gets its layered stone/dirt/surface fill, ore rolls
    /// below the surface band, and a chance of a tree or village structure
    /// anchored at the surface. Structures are clamped to the chunk; they
    /// do not reach into neighbors.
    pub fn generate(&mut self, terrain: &TerrainGenerator) {
        let (origin_x, origin_z) = self.key.world_origin();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let world_x = origin_x + x;
                let world_z = origin_z + z;
                let surface = terrain.height(world_x, world_z);
                let biome = terrain.biome(world_x, world_z);

                for y in 0..WORLD_HEIGHT {
                    let material = terrain.column_material(y, surface, biome);
                    if material != BlockType::AIR {
                        self.set_block(x, y, z, material);
                    }

                    if y < surface - 5 {
                        if let Some(ore) = terrain.roll_ore(y) {
                            self.set_block(x, y, z, ore);
                        }
                    }
                }

                if terrain.roll_tree(biome, surface) {
                    self.grow_tree(x, surface, z);
                }

                if terrain.roll_village(surface) {
                    self.raise_village(x, surface, z);
                }
            }
        }

        self.dirty = true;
    }

    /// Places a tree with its trunk base at chunk-local `(x, base_y, z)`.
    ///
    /// The trunk is 5 to 8 blocks tall; the canopy is a sphere of radius
    /// 3.5 around the trunk top, filled at 80% per candidate cell.
    fn grow_tree(&mut self, x: i32, base_y: i32, z: i32) {
        let trunk_height = 5 + fastrand::i32(0..4);

        for dy in 0..trunk_height {
            self.set_block(x, base_y + dy, z, BlockType::WOOD);
        }

        let canopy_y = base_y + trunk_height - 1;
        for dx in -CANOPY_RADIUS..=CANOPY_RADIUS {
            for dy in 0..=CANOPY_RADIUS {
                for dz in -CANOPY_RADIUS..=CANOPY_RADIUS {
                    let distance = ((dx * dx + dy * dy + dz * dz) as f64).sqrt();
                    if distance < 3.5 && fastrand::f64() < 0.8 {
                        self.set_block(x + dx, canopy_y + dy, z + dz, BlockType::LEAVES);
                    }
                }
            }
        }
    }

    /// Raises a hollow 5x5x4 village hut with its corner at `(x, base_y, z)`:
    /// three layers of perimeter walls under a full roof layer.
    fn raise_village(&mut self, x: i32, base_y: i32, z: i32) {
        const HOUSE_SIZE: i32 = 5;

        for dx in 0..HOUSE_SIZE {
            for dz in 0..HOUSE_SIZE {
                let on_perimeter =
                    dx == 0 || dx == HOUSE_SIZE - 1 || dz == 0 || dz == HOUSE_SIZE - 1;
                for dy in 0..4 {
                    if (on_perimeter && dy < 3) || dy == 3 {
                        self.set_block(x + dx, base_y + dy, z + dz, BlockType::WOOD);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::chunk::ChunkKey;
    use crate::voxels::terrain::Biome;

    fn generated(key: ChunkKey) -> (Chunk, TerrainGenerator) {
        let terrain = TerrainGenerator::new();
        let mut chunk = Chunk::new(key);
        chunk.generate(&terrain);
        (chunk, terrain)
    }

    #[test]
    fn surface_material_matches_the_biome() {
        let (chunk, terrain) = generated(ChunkKey::new(0, 0));
        let biome = terrain.biome(0, 0);
        let surface = terrain.height(0, 0);
        let expected = match biome {
            Biome::Desert => BlockType::SAND,
            _ => BlockType::GRASS,
        };
        assert_eq!(chunk.get_block(0, surface - 1, 0), expected);
        assert_eq!(chunk.get_block(0, surface - 9, 0), BlockType::STONE);
    }

    #[test]
    fn deterministic_layers_agree_between_generations() {
        // Height and biome are closed-form; two generations of the same
        // chunk must agree on the surface and the dirt band just below it.
        // Ore and flora placement roll the runtime RNG and may differ.
        let key = ChunkKey::new(3, -2);
        let (first, terrain) = generated(key);
        let (second, _) = generated(key);
        let (origin_x, origin_z) = key.world_origin();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let surface = terrain.height(origin_x + x, origin_z + z);
                assert_eq!(
                    first.get_block(x, surface - 1, z),
                    second.get_block(x, surface - 1, z)
                );
                // surface - 2 sits above the ore band (< surface - 5).
                assert_eq!(
                    first.get_block(x, surface - 2, z),
                    second.get_block(x, surface - 2, z)
                );
            }
        }
    }

    #[test]
    fn air_above_the_tallest_structures() {
        let (chunk, terrain) = generated(ChunkKey::new(1, 1));
        let (origin_x, origin_z) = ChunkKey::new(1, 1).world_origin();
        // Canopies top out at surface + trunk(8) - 1 + 3; nothing may appear
        // above that.
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let surface = terrain.height(origin_x + x, origin_z + z);
                let ceiling = (surface + 11).min(WORLD_HEIGHT - 1);
                for y in ceiling..WORLD_HEIGHT {
                    // Neighboring columns' canopies can still reach here, so
                    // only leaves or wood are admissible above the ceiling.
                    let block = chunk.get_block(x, y, z);
                    assert!(
                        matches!(block, BlockType::AIR | BlockType::LEAVES | BlockType::WOOD),
                        "unexpected {block:?} at ({x},{y},{z})"
                    );
                }
            }
        }
    }
}
