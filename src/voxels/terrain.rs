//! # Terrain Generator Module
//!
//! This module provides the `TerrainGenerator`, a pure mapping from world
//! `(x, z)` coordinates to height, biome, and structure decisions. The
//! height and biome fields are closed-form trigonometric functions and are
//! therefore fully deterministic; ore and structure placement roll the
//! runtime RNG and vary between generations of the same chunk.

use super::block::block_type::BlockType;

/// A terrain classification derived from low-frequency noise.
///
/// The biome decides surface materials and whether trees may grow.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Biome {
    /// Default grassland.
    Plains,
    /// Sand-covered terrain with no trees.
    Desert,
    /// Grassland with the same fill as plains; reserved for denser flora.
    Forest,
}

/// Maximum surface height at which trees are still placed.
const TREE_HEIGHT_LIMIT: i32 = 80;

/// Per-column probability of a tree outside deserts.
const TREE_CHANCE: f64 = 0.02;

/// Per-column probability of a village structure.
const VILLAGE_CHANCE: f64 = 0.001;

/// Pure function mapping world coordinates to terrain decisions.
///
/// One generator is owned by the world and shared by every chunk
/// generation pass. It carries no state; the deterministic fields depend
/// only on their inputs.
pub struct TerrainGenerator;

impl TerrainGenerator {
    /// Creates a new terrain generator.
    pub fn new() -> Self {
        TerrainGenerator
    }

    /// Computes the surface height of the column at world `(x, z)`.
    ///
    /// Three octaves of sine/cosine terrain are summed over a base height
    /// of 40, and a mountain term is added wherever the low-frequency
    /// mountain mask exceeds its threshold.
    pub fn height(&self, x: i32, z: i32) -> i32 {
        let (fx, fz) = (x as f64, z as f64);

        let mut height = 40.0;
        height += (fx * 0.01).sin() * (fz * 0.01).cos() * 20.0;
        height += (fx * 0.05).sin() * (fz * 0.05).cos() * 10.0;
        height += (fx * 0.1).sin() * (fz * 0.1).cos() * 5.0;

        let mountain = (fx * 0.003).sin() * (fz * 0.003).cos();
        if mountain > 0.3 {
            height += mountain * 40.0;
        }

        height.floor() as i32
    }

    /// Classifies the biome of the column at world `(x, z)`.
    pub fn biome(&self, x: i32, z: i32) -> Biome {
        let value = (x as f64 * 0.001).sin() * (z as f64 * 0.001).cos();
        if value > 0.3 {
            Biome::Desert
        } else if value < -0.3 {
            Biome::Forest
        } else {
            Biome::Plains
        }
    }

    /// The material filling the column at height `y`, given the column's
    /// surface height and biome. Returns `AIR` above the surface.
    pub fn column_material(&self, y: i32, surface: i32, biome: Biome) -> BlockType {
        if y < surface - 8 {
            BlockType::STONE
        } else if y < surface - 1 {
            match biome {
                Biome::Desert => BlockType::SAND,
                _ => BlockType::DIRT,
            }
        } else if y == surface - 1 {
            match biome {
                Biome::Desert => BlockType::SAND,
                _ => BlockType::GRASS,
            }
        } else {
            BlockType::AIR
        }
    }

    /// Rolls the ore table for a voxel at height `y`.
    ///
    /// The base roll succeeds 1% of the time; successful rolls pick the
    /// rarest ore the depth allows (diamond below 20 on 30% of rolls,
    /// iron below 40 on 50%, coal below 60). Callers must only roll for
    /// voxels deeper than `surface - 5`.
    pub fn roll_ore(&self, y: i32) -> Option<BlockType> {
        if fastrand::f64() >= 0.01 {
            return None;
        }
        if y < 20 && fastrand::f64() < 0.3 {
            Some(BlockType::DIAMOND_ORE)
        } else if y < 40 && fastrand::f64() < 0.5 {
            Some(BlockType::IRON_ORE)
        } else if y < 60 {
            Some(BlockType::COAL_ORE)
        } else {
            None
        }
    }

    /// Rolls whether the column grows a tree.
    ///
    /// Deserts never grow trees, and columns above the tree line are
    /// skipped so canopies stay inside the world height.
    pub fn roll_tree(&self, biome: Biome, surface: i32) -> bool {
        biome != Biome::Desert && surface < TREE_HEIGHT_LIMIT && fastrand::f64() < TREE_CHANCE
    }

    /// Rolls whether the column anchors a village structure.
    ///
    /// Villages only appear in the elevation band (30, 70).
    pub fn roll_village(&self, surface: i32) -> bool {
        surface > 30 && surface < 70 && fastrand::f64() < VILLAGE_CHANCE
    }
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_deterministic() {
        let terrain = TerrainGenerator::new();
        for (x, z) in [(0, 0), (17, -256), (-1000, 999), (123_456, -654_321)] {
            assert_eq!(terrain.height(x, z), terrain.height(x, z));
        }
    }

    #[test]
    fn origin_height_is_the_base_level() {
        let terrain = TerrainGenerator::new();
        // All sine terms vanish at x = 0 and the mountain mask is zero.
        assert_eq!(terrain.height(0, 0), 40);
    }

    #[test]
    fn biome_thresholds_classify_as_expected() {
        let terrain = TerrainGenerator::new();
        // sin(1.571) ~ 1.0, so x = 1571, z = 0 is deep in desert territory.
        assert_eq!(terrain.biome(1571, 0), Biome::Desert);
        assert_eq!(terrain.biome(-1571, 0), Biome::Forest);
        assert_eq!(terrain.biome(0, 0), Biome::Plains);
    }

    #[test]
    fn column_fill_layers_stack_correctly() {
        let terrain = TerrainGenerator::new();
        let surface = 50;
        assert_eq!(terrain.column_material(10, surface, Biome::Plains), BlockType::STONE);
        assert_eq!(terrain.column_material(surface - 4, surface, Biome::Plains), BlockType::DIRT);
        assert_eq!(terrain.column_material(surface - 1, surface, Biome::Plains), BlockType::GRASS);
        assert_eq!(terrain.column_material(surface, surface, Biome::Plains), BlockType::AIR);
        assert_eq!(terrain.column_material(surface - 1, surface, Biome::Desert), BlockType::SAND);
        assert_eq!(terrain.column_material(surface - 4, surface, Biome::Desert), BlockType::SAND);
    }

    #[test]
    fn ore_rolls_respect_depth_tiers() {
        let terrain = TerrainGenerator::new();
        // Above y = 60 the roll can never produce an ore.
        for _ in 0..2000 {
            assert_eq!(terrain.roll_ore(70), None);
        }
        // Below y = 20 all three ores are reachable; just assert the roll
        // only ever yields ore materials.
        for _ in 0..2000 {
            if let Some(ore) = terrain.roll_ore(10) {
                assert!(matches!(
                    ore,
                    BlockType::COAL_ORE | BlockType::IRON_ORE | BlockType::DIAMOND_ORE
                ));
            }
        }
    }

    #[test]
    fn deserts_never_roll_trees() {
        let terrain = TerrainGenerator::new();
        for _ in 0..2000 {
            assert!(!terrain.roll_tree(Biome::Desert, 50));
            assert!(!terrain.roll_tree(Biome::Plains, 90));
        }
    }
}
